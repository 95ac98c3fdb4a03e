//! Optical recognition via the `tesseract` CLI.
//!
//! The image bytes are written to a scratch file and `tesseract` is asked
//! to print recognized text to stdout. Requires the binary on `PATH`; a
//! missing or failing binary surfaces as [`ExtractError::Ocr`] with the
//! engine's stderr attached.

use std::io::Write as _;
use std::process::Command;

use crate::ExtractError;

/// Recognition language passed to tesseract.
const OCR_LANGUAGE: &str = "eng";

/// Runs the uploaded image through tesseract and returns its text output.
///
/// # Errors
///
/// Returns [`ExtractError::Ocr`] if the engine cannot be started or exits
/// non-zero, or [`ExtractError::Io`] if the scratch file cannot be
/// written.
pub fn recognize(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut scratch = tempfile::NamedTempFile::new()?;
    scratch.write_all(bytes)?;
    scratch.flush()?;

    let output = Command::new("tesseract")
        .arg(scratch.path())
        .arg("stdout")
        .arg("-l")
        .arg(OCR_LANGUAGE)
        .output()
        .map_err(|e| ExtractError::Ocr(format!("tesseract failed to start: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::Ocr(format!(
            "tesseract exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    log::debug!("OCR produced {} characters", text.len());

    Ok(text)
}
