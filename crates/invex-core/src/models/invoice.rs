//! Invoice data models produced by the parser.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured record extracted from one invoice document.
///
/// Created once per parse call and immutable afterwards. When subtotal,
/// discount and tax are all resolved, `total == subtotal - discount + tax`
/// holds exactly in decimal arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceExtract {
    /// Invoice number/identifier.
    pub invoice_number: Option<String>,

    /// Date the invoice was issued (ISO-8601 on the wire).
    pub invoice_date: Option<NaiveDate>,

    /// Payment due date.
    pub due_date: Option<NaiveDate>,

    /// Vendor/supplier name.
    pub vendor: Option<String>,

    /// Net amount before discount and tax.
    pub subtotal: Option<Decimal>,

    /// Discount amount (resolved to zero when absent).
    pub discount: Option<Decimal>,

    /// Tax amount.
    pub tax: Option<Decimal>,

    /// Grand total, always derived from the other three amounts rather than
    /// taken from the OCR'd total string.
    pub total: Option<Decimal>,

    /// Detected 3-letter currency code.
    pub currency: Option<String>,

    /// Line items in source order.
    pub items: Vec<LineItem>,

    /// Aggregate confidence score (0.0 - 1.0).
    pub score: f32,

    /// Normalized source text the record was extracted from.
    pub raw_text: String,
}

/// A single tabular line item.
///
/// Rate and amount are taken from the source line independently; nothing
/// enforces `quantity * rate == amount` since scanned data is often
/// inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    #[serde(rename = "item")]
    pub description: String,

    /// Quantity.
    pub quantity: u32,

    /// Unit rate.
    pub rate: Decimal,

    /// Line amount.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_item_serializes_with_item_key() {
        let item = LineItem {
            description: "Widget A".to_string(),
            quantity: 3,
            rate: Decimal::from_str("10.00").unwrap(),
            amount: Decimal::from_str("30.00").unwrap(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["item"], "Widget A");
        assert_eq!(json["quantity"], 3);
    }

    #[test]
    fn test_dates_serialize_as_iso() {
        let extract = InvoiceExtract {
            invoice_number: Some("INV-001".to_string()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            due_date: None,
            vendor: None,
            subtotal: None,
            discount: None,
            tax: None,
            total: None,
            currency: None,
            items: Vec::new(),
            score: 1.0,
            raw_text: String::new(),
        };

        let json = serde_json::to_value(&extract).unwrap();
        assert_eq!(json["invoice_date"], "2024-01-01");
        assert!(json["due_date"].is_null());
    }
}
