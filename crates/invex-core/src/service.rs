//! High-level facade combining a text engine and the parser.

use tracing::info;

use crate::engine::OcrEngine;
use crate::error::Result;
use crate::models::invoice::InvoiceExtract;
use crate::parser::InvoiceParser;

/// Extract text from a document and parse it into an invoice record.
///
/// Engine failures (unreadable/unsupported file) and parse failures (text not
/// invoice-like enough) surface as distinct error variants so the caller can
/// classify them.
pub fn process_invoice(
    engine: &dyn OcrEngine,
    parser: &InvoiceParser,
    data: &[u8],
    filename: &str,
) -> Result<InvoiceExtract> {
    let text = engine.extract_text(data, filename)?;
    let extract = parser.parse(&text)?;

    info!(
        "invoice parsed (score {:.2}): {}",
        extract.score,
        extract.invoice_number.as_deref().unwrap_or("<no number>")
    );

    Ok(extract)
}
