//! Core library for invoice OCR text processing.
//!
//! This crate provides:
//! - Label location in noisy, inconsistently formatted text
//! - Amount and date normalization with configurable resolution
//! - Financial reconciliation (subtotal/discount/tax/total) in exact decimals
//! - Line-item extraction and confidence-gated result assembly

pub mod engine;
pub mod error;
pub mod models;
pub mod parser;
pub mod rules;
pub mod service;

pub use engine::{OcrEngine, PlainTextEngine};
pub use error::{EngineError, InvexError, ParseError, Result};
pub use models::config::{FieldLabelConfig, InvoiceField, ParserConfig};
pub use models::invoice::{InvoiceExtract, LineItem};
pub use parser::InvoiceParser;
pub use service::process_invoice;
