//! Invoice parser: orchestrates label location, normalization and financial
//! reconciliation over raw OCR text.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::error::ParseError;
use crate::models::config::{FieldLabelConfig, InvoiceField, ParserConfig};
use crate::models::invoice::InvoiceExtract;
use crate::rules::dates::{find_date_near_label, parse_date};
use crate::rules::items::extract_line_items;
use crate::rules::labels::LabelLocator;
use crate::rules::patterns::{LINE_ENDINGS, SPACE_RUNS};
use crate::rules::totals::{reconcile, RawAmounts};
use crate::rules::{amounts, LabelMatch};

/// Lines scanned below a date label before giving up.
const DATE_SEARCH_WINDOW: usize = 5;

/// Textual fallback phrase for a missing due date.
const NET_15_PHRASE: &str = "payment due within 15 days";

/// Rule-based invoice parser.
///
/// Pure and synchronous over an in-memory string; the alias table and
/// compiled label regexes are read-only after construction, so one parser can
/// serve concurrent invocations.
pub struct InvoiceParser {
    min_confidence: f32,
    date_day_first: bool,
    locator: LabelLocator,
    aliases: FieldLabelConfig,
}

impl InvoiceParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::from_config(&ParserConfig::default())
    }

    /// Create a parser from an explicit configuration.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            date_day_first: config.date_day_first,
            locator: LabelLocator::new(&config.field_aliases, config.fuzzy_threshold),
            aliases: config.field_aliases.clone(),
        }
    }

    /// Set the minimum confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Set day-before-month resolution for ambiguous dates.
    pub fn with_day_first(mut self, day_first: bool) -> Self {
        self.date_day_first = day_first;
        self
    }

    /// Parse raw OCR text into a structured invoice record.
    ///
    /// Per-field failures degrade that field to None and lower the aggregate
    /// score; only the final confidence check aborts the parse.
    pub fn parse(&self, text: &str) -> Result<InvoiceExtract, ParseError> {
        let text = normalize(text);
        if text.is_empty() {
            return Err(ParseError::NoData);
        }
        let lines: Vec<&str> = text.lines().collect();

        info!("parsing invoice from {} characters of text", text.len());

        // Field resolution: locate every configured field, collect scores
        let mut values: HashMap<InvoiceField, String> = HashMap::new();
        let mut scores: Vec<f32> = Vec::new();

        for field in InvoiceField::ALL {
            if let Some(LabelMatch { value, confidence }) =
                self.locator.locate(field, &text, &lines)
            {
                debug!(field = field.key(), confidence, "field located");
                values.insert(field, value);
                scores.push(confidence);
            }
        }

        let score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        };

        if score < self.min_confidence {
            return Err(ParseError::LowConfidence { score });
        }

        // Financial reconciliation
        let resolved = reconcile(
            RawAmounts {
                subtotal: values.get(&InvoiceField::Subtotal).map(String::as_str),
                discount: values.get(&InvoiceField::Discount).map(String::as_str),
                tax: values.get(&InvoiceField::Tax).map(String::as_str),
            },
            &text,
        );

        // Dates: labeled-window scan first, then the located value itself
        let invoice_date = self.resolve_date(InvoiceField::InvoiceDate, &values, &lines);
        let mut due_date = self.resolve_date(InvoiceField::DueDate, &values, &lines);

        if due_date.is_none() {
            if let Some(issued) = invoice_date {
                if text.to_lowercase().contains(NET_15_PHRASE) {
                    due_date = issued.checked_add_days(Days::new(15));
                }
            }
        }

        let extract = InvoiceExtract {
            invoice_number: values.remove(&InvoiceField::InvoiceNumber),
            invoice_date,
            due_date,
            vendor: values.remove(&InvoiceField::Vendor),
            subtotal: resolved.subtotal,
            discount: Some(resolved.discount),
            tax: resolved.tax,
            total: Some(resolved.total),
            currency: amounts::detect_currency(&text),
            items: extract_line_items(&lines),
            score,
            raw_text: text,
        };

        debug!(
            "extracted invoice {:?} with score {:.2}",
            extract.invoice_number, extract.score
        );

        Ok(extract)
    }

    fn resolve_date(
        &self,
        field: InvoiceField,
        values: &HashMap<InvoiceField, String>,
        lines: &[&str],
    ) -> Option<NaiveDate> {
        find_date_near_label(
            lines,
            self.aliases.aliases(field),
            DATE_SEARCH_WINDOW,
            self.date_day_first,
        )
        .or_else(|| {
            values
                .get(&field)
                .and_then(|v| parse_date(v, self.date_day_first))
        })
    }
}

impl Default for InvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse space/tab runs, unify line endings and trim.
fn normalize(text: &str) -> String {
    let text = LINE_ENDINGS.replace_all(text, "\n");
    SPACE_RUNS.replace_all(&text, " ").trim().to_string()
}
