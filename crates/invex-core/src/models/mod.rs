//! Data models and configuration.

pub mod config;
pub mod invoice;

pub use config::{FieldLabelConfig, InvoiceField, ParserConfig};
pub use invoice::{InvoiceExtract, LineItem};
