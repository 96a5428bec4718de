//! Configuration structures for the extraction pipeline.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The fields the parser tries to locate in invoice text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    InvoiceNumber,
    InvoiceDate,
    DueDate,
    Vendor,
    Subtotal,
    Discount,
    Tax,
    Total,
}

impl InvoiceField {
    /// All fields, in resolution order.
    pub const ALL: [InvoiceField; 8] = [
        InvoiceField::InvoiceNumber,
        InvoiceField::InvoiceDate,
        InvoiceField::DueDate,
        InvoiceField::Vendor,
        InvoiceField::Subtotal,
        InvoiceField::Discount,
        InvoiceField::Tax,
        InvoiceField::Total,
    ];

    /// Key used in configuration files and logs.
    pub fn key(&self) -> &'static str {
        match self {
            InvoiceField::InvoiceNumber => "invoice_number",
            InvoiceField::InvoiceDate => "invoice_date",
            InvoiceField::DueDate => "due_date",
            InvoiceField::Vendor => "vendor",
            InvoiceField::Subtotal => "subtotal",
            InvoiceField::Discount => "discount",
            InvoiceField::Tax => "tax",
            InvoiceField::Total => "total",
        }
    }
}

/// Mapping from field to the ordered list of label aliases used to locate it.
///
/// Read-only once built; a parser shares it across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLabelConfig {
    aliases: HashMap<InvoiceField, Vec<String>>,
}

impl FieldLabelConfig {
    /// Build from an explicit field -> aliases map. Fields missing from the
    /// map have no aliases and are never located.
    pub fn new(aliases: HashMap<InvoiceField, Vec<String>>) -> Self {
        Self { aliases }
    }

    /// Aliases for a field, in priority order.
    pub fn aliases(&self, field: InvoiceField) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for FieldLabelConfig {
    fn default() -> Self {
        let mut aliases = HashMap::new();

        let insert = |map: &mut HashMap<InvoiceField, Vec<String>>,
                      field: InvoiceField,
                      labels: &[&str]| {
            map.insert(field, labels.iter().map(|s| s.to_string()).collect());
        };

        insert(
            &mut aliases,
            InvoiceField::InvoiceNumber,
            &[
                "invoice number",
                "inv no",
                "invoice #",
                "bill no",
                "ref",
                "invoice no.",
                "no:",
                "number",
            ],
        );
        insert(
            &mut aliases,
            InvoiceField::InvoiceDate,
            &["invoice date", "date", "bill date"],
        );
        insert(
            &mut aliases,
            InvoiceField::DueDate,
            &["due date", "payment due", "duedate", "due-date"],
        );
        insert(
            &mut aliases,
            InvoiceField::Vendor,
            &["vendor", "supplier", "seller"],
        );
        insert(
            &mut aliases,
            InvoiceField::Subtotal,
            &["subtotal", "sub-total", "sub total"],
        );
        insert(&mut aliases, InvoiceField::Discount, &["discount", "deduct"]);
        insert(
            &mut aliases,
            InvoiceField::Tax,
            &["tax", "vat", "gst", "cgst", "sgst"],
        );
        insert(
            &mut aliases,
            InvoiceField::Total,
            &["total", "grand total", "amount due"],
        );

        Self { aliases }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum aggregate confidence to accept a parse.
    pub min_confidence: f32,

    /// Resolve ambiguous numeric dates day-before-month.
    pub date_day_first: bool,

    /// Fuzzy partial-similarity threshold (0-100) for label matching.
    pub fuzzy_threshold: f64,

    /// Label alias table.
    pub field_aliases: FieldLabelConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            date_day_first: true,
            fuzzy_threshold: 85.0,
            field_aliases: FieldLabelConfig::default(),
        }
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
