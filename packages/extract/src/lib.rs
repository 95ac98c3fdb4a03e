#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw text extraction for uploaded mark sheets.
//!
//! Two backends behind one function: documents with a text layer go
//! through pure-Rust extraction ([`pdf_extract`]); raster scans are run
//! through the `tesseract` CLI. The engine itself is an external
//! collaborator; this crate only decides which backend applies and
//! surfaces its text or failure. No image preprocessing, no confidence
//! scoring.

pub mod ocr;

/// Errors specific to text extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The uploaded bytes are neither a PDF nor a supported image.
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// The OCR engine failed or could not be started.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The kind of uploaded media, deciding the extraction backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A page-description document with a text layer.
    Pdf,
    /// A raster scan (PNG, JPEG, or TIFF) requiring optical recognition.
    Image,
}

impl MediaKind {
    /// Resolves a kind from a declared MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split(';').next().unwrap_or(mime).trim() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" | "image/jpeg" | "image/jpg" | "image/tiff" => Some(Self::Image),
            _ => None,
        }
    }

    /// Resolves a kind from the leading bytes of the upload. Used when the
    /// client declared no usable MIME type.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
            || bytes.starts_with(&[0xFF, 0xD8, 0xFF])
            || bytes.starts_with(b"II*\0")
            || bytes.starts_with(b"MM\0*")
        {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// Resolves a kind from the declared MIME type, falling back to
    /// content sniffing.
    #[must_use]
    pub fn resolve(declared_mime: Option<&str>, bytes: &[u8]) -> Option<Self> {
        declared_mime
            .and_then(Self::from_mime)
            .or_else(|| Self::sniff(bytes))
    }
}

/// Extracts raw text from uploaded bytes.
///
/// The declared MIME type picks the backend; when it is absent or
/// unrecognized the leading bytes are sniffed instead.
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedMedia`] when no backend applies,
/// otherwise the backend's failure.
pub fn extract(bytes: &[u8], declared_mime: Option<&str>) -> Result<String, ExtractError> {
    let kind = MediaKind::resolve(declared_mime, bytes).ok_or_else(|| {
        ExtractError::UnsupportedMedia(declared_mime.unwrap_or("unknown").to_owned())
    })?;
    extract_text(bytes, kind)
}

/// Extracts raw text using the backend for `kind`.
///
/// # Errors
///
/// Returns [`ExtractError`] if the backend cannot process the input.
pub fn extract_text(bytes: &[u8], kind: MediaKind) -> Result<String, ExtractError> {
    match kind {
        MediaKind::Pdf => {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractError::Pdf(format!("failed to extract text from PDF: {e}")))?;
            log::debug!("Extracted {} characters from PDF text layer", text.len());
            Ok(text)
        }
        MediaKind::Image => ocr::recognize(bytes),
    }
}
