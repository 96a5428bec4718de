//! Label location: find the text span carrying a configured field's value.

use std::collections::HashMap;

use rapidfuzz::fuzz;
use regex::Regex;

use crate::models::config::{FieldLabelConfig, InvoiceField};

use super::patterns::NON_ALNUM;

/// Confidence for a same-line `label: value` match.
const INLINE_CONFIDENCE: f32 = 1.0;
/// Confidence for a value found on the line after its label.
const POSITIONAL_CONFIDENCE: f32 = 0.8;

/// A located field value with its match quality.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatch {
    /// Raw value text, trimmed.
    pub value: String,
    /// Match-quality score contributing to the aggregate confidence.
    pub confidence: f32,
}

/// Locates field values by label aliases.
///
/// Per-field inline regexes are compiled once at construction; the locator is
/// read-only afterwards and safe to share across threads.
pub struct LabelLocator {
    inline: HashMap<InvoiceField, Regex>,
    aliases: HashMap<InvoiceField, Vec<String>>,
    canonical: HashMap<InvoiceField, Vec<String>>,
    fuzzy_threshold: f64,
}

impl LabelLocator {
    /// Build a locator from an alias table and fuzzy similarity threshold.
    pub fn new(config: &FieldLabelConfig, fuzzy_threshold: f64) -> Self {
        let mut inline = HashMap::new();
        let mut aliases = HashMap::new();
        let mut canonical = HashMap::new();

        for field in InvoiceField::ALL {
            let field_aliases: Vec<String> = config
                .aliases(field)
                .iter()
                .map(|a| a.to_lowercase())
                .collect();
            if field_aliases.is_empty() {
                continue;
            }

            let alternation = field_aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            // Horizontal whitespace only: a label at end of line must fall
            // through to the positional tier, not swallow the next line.
            let pattern = format!(r"(?i)(?:{})[ \t]*[:#]?[ \t]*(.+)", alternation);
            // Aliases are escaped, so the pattern is valid by construction
            inline.insert(field, Regex::new(&pattern).unwrap());

            canonical.insert(
                field,
                field_aliases
                    .iter()
                    .map(|a| NON_ALNUM.replace_all(a, "").into_owned())
                    .filter(|a| !a.is_empty())
                    .collect(),
            );
            aliases.insert(field, field_aliases);
        }

        Self {
            inline,
            aliases,
            canonical,
            fuzzy_threshold,
        }
    }

    /// Find the most likely value span for a field.
    ///
    /// Tries an inline `label[:#] value` match over the full text first
    /// (confidence 1.0), then falls back to the line following a label-bearing
    /// line (confidence 0.8). None when neither applies.
    pub fn locate(&self, field: InvoiceField, text: &str, lines: &[&str]) -> Option<LabelMatch> {
        if let Some(re) = self.inline.get(&field) {
            if let Some(caps) = re.captures(text) {
                return Some(LabelMatch {
                    value: caps[1].trim().to_string(),
                    confidence: INLINE_CONFIDENCE,
                });
            }
        }

        let idx = self.label_line_index(field, lines)?;
        let value_line = lines.get(idx + 1)?;
        Some(LabelMatch {
            value: value_line.trim().to_string(),
            confidence: POSITIONAL_CONFIDENCE,
        })
    }

    /// Index of the first line that carries the field's label, by normalized
    /// containment or fuzzy partial similarity.
    fn label_line_index(&self, field: InvoiceField, lines: &[&str]) -> Option<usize> {
        let canonical = self.canonical.get(&field)?;
        let aliases = self.aliases.get(&field)?;

        for (i, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            let stripped = NON_ALNUM.replace_all(&lower, "");

            if canonical.iter().any(|c| stripped.contains(c.as_str())) {
                return Some(i);
            }
            if aliases
                .iter()
                .any(|a| partial_similarity(a, &lower) > self.fuzzy_threshold)
            {
                return Some(i);
            }
        }

        None
    }
}

/// Best similarity of `needle` against `needle`-sized character windows of
/// `haystack`, on a 0-100 scale.
///
/// rapidfuzz exposes only the full-string ratio, so substring alignment is
/// recovered by sliding the comparison across the longer side.
fn partial_similarity(needle: &str, haystack: &str) -> f64 {
    let needle: Vec<char> = needle.chars().collect();
    let haystack: Vec<char> = haystack.chars().collect();
    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }
    // fuzz::ratio reports on a 0-1 scale; rescale to 0-100.
    if haystack.len() <= needle.len() {
        return fuzz::ratio(needle.iter().copied(), haystack.iter().copied()) * 100.0;
    }
    haystack
        .windows(needle.len())
        .map(|w| fuzz::ratio(needle.iter().copied(), w.iter().copied()))
        .fold(0.0, f64::max)
        * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> LabelLocator {
        LabelLocator::new(&FieldLabelConfig::default(), 85.0)
    }

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_inline_match_scores_full() {
        let text = "Invoice Number: INV-2024-001\nTotal: 97.20";
        let m = locator()
            .locate(InvoiceField::InvoiceNumber, text, &lines(text))
            .unwrap();

        assert_eq!(m.value, "INV-2024-001");
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn test_inline_match_hash_separator() {
        let text = "Invoice # 42";
        let m = locator()
            .locate(InvoiceField::InvoiceNumber, text, &lines(text))
            .unwrap();

        assert_eq!(m.value, "42");
    }

    #[test]
    fn test_positional_match_next_line() {
        let text = "*** S u b t o t a l ***\n100.00";
        let m = locator()
            .locate(InvoiceField::Subtotal, text, &lines(text))
            .unwrap();

        assert_eq!(m.value, "100.00");
        assert_eq!(m.confidence, 0.8);
    }

    #[test]
    fn test_no_match() {
        let text = "completely unrelated text\nwith no labels";
        assert!(
            locator()
                .locate(InvoiceField::Vendor, text, &lines(text))
                .is_none()
        );
    }

    #[test]
    fn test_label_on_last_line_has_no_value() {
        let text = "some text\nsubtotal";
        assert!(
            locator()
                .locate(InvoiceField::Subtotal, text, &lines(text))
                .is_none()
        );
    }

    #[test]
    fn test_fuzzy_match_on_misread_label() {
        // "Subtotai" defeats both the inline regex and canonical containment,
        // leaving only the similarity tier.
        let text = "Subtotai:\n100.00";
        let m = locator()
            .locate(InvoiceField::Subtotal, text, &lines(text))
            .unwrap();

        assert_eq!(m.value, "100.00");
        assert_eq!(m.confidence, 0.8);
    }

    #[test]
    fn test_fuzzy_match_respects_threshold() {
        let strict = LabelLocator::new(&FieldLabelConfig::default(), 99.0);
        let text = "Subtotai:\n100.00";
        assert!(
            strict
                .locate(InvoiceField::Subtotal, text, &lines(text))
                .is_none()
        );
    }

    #[test]
    fn test_partial_similarity_finds_embedded_label() {
        assert!(partial_similarity("subtotal", "order subtotal amount") > 99.0);
        assert!(partial_similarity("subtotal", "shipping address") < 60.0);
        assert_eq!(partial_similarity("subtotal", ""), 0.0);
    }

    #[test]
    fn test_inline_beats_positional() {
        let text = "Vendor\nAcme Corp\nVendor: Widgets Inc";
        let m = locator()
            .locate(InvoiceField::Vendor, text, &lines(text))
            .unwrap();

        assert_eq!(m.value, "Widgets Inc");
        assert_eq!(m.confidence, 1.0);
    }
}
