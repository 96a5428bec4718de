//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Text engine error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invoice parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by text extraction engines.
///
/// These map to client-input failures: the file itself could not be read,
/// before any parsing was attempted.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The file extension is not handled by this engine.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The file contents could not be decoded as text.
    #[error("invalid text encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors raised by the invoice parser.
///
/// Text was present but could not be reconciled into an invoice record.
/// Recoverable by the caller; never a process-fatal condition.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Aggregate confidence fell below the configured threshold.
    #[error("low confidence score ({score:.2}): text does not look like an invoice")]
    LowConfidence {
        /// The computed aggregate confidence.
        score: f32,
    },

    /// No invoice data could be extracted at all.
    #[error("no invoice data found")]
    NoData,
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
