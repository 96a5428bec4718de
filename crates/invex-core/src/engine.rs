//! Text extraction engine boundary.
//!
//! The OCR step (image/PDF rasterization and recognition) is external to this
//! crate; callers plug in any engine implementing [`OcrEngine`]. The bundled
//! [`PlainTextEngine`] handles already-extracted `.txt` documents so the
//! pipeline runs end-to-end without an OCR backend.

use std::path::Path;

use crate::error::EngineError;

/// A text extraction engine, polymorphic over file type.
pub trait OcrEngine: Send + Sync {
    /// Extract raw text from a document.
    ///
    /// Multi-page documents are concatenated page-by-page with newline
    /// separators. Errors with [`EngineError::UnsupportedFormat`] for
    /// unrecognized extensions.
    fn extract_text(&self, data: &[u8], filename: &str) -> Result<String, EngineError>;
}

/// Engine for documents that are already plain text.
#[derive(Debug, Default)]
pub struct PlainTextEngine;

impl PlainTextEngine {
    pub fn new() -> Self {
        Self
    }
}

impl OcrEngine for PlainTextEngine {
    fn extract_text(&self, data: &[u8], filename: &str) -> Result<String, EngineError> {
        match file_extension(filename).as_deref() {
            Some("txt") => Ok(String::from_utf8_lossy(data).into_owned()),
            Some(ext) => Err(EngineError::UnsupportedFormat(format!(".{ext}"))),
            None => Err(EngineError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Lowercased extension of a file name.
pub(crate) fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
