//! Financial reconciliation: resolve subtotal/discount/tax/total from raw
//! matched segments into a self-consistent arithmetic whole.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::amounts::{max_amount, to_decimal};
use super::patterns::PERCENT_VALUE;

/// Raw matched segments for the four monetary fields, possibly containing `%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawAmounts<'a> {
    pub subtotal: Option<&'a str>,
    pub discount: Option<&'a str>,
    pub tax: Option<&'a str>,
}

/// Resolved monetary values.
///
/// Discount is always resolved (zero when absent). Total is derived as
/// `(subtotal - discount) + tax` and overrides any OCR'd total string.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAmounts {
    pub subtotal: Option<Decimal>,
    pub discount: Decimal,
    pub tax: Option<Decimal>,
    pub total: Decimal,
}

/// Resolve the monetary fields under a fixed precedence.
///
/// 1. Percentage discount applies against the subtotal when the subtotal is
///    already known, otherwise the segment is read as a literal amount.
/// 2. Percentage tax applies against the discounted base.
/// 3. A subtotal that was never matched is inferred as the largest amount
///    anywhere in the text; the base is recomputed, the tax is not.
/// 4. Total is always computed, never taken from the matched total segment.
pub fn reconcile(raw: RawAmounts<'_>, full_text: &str) -> ResolvedAmounts {
    let mut subtotal = to_decimal(raw.subtotal);

    let discount = match raw.discount {
        Some(seg) if seg.contains('%') => match (percent_value(seg), subtotal) {
            (Some(pct), Some(st)) => st * pct / Decimal::ONE_HUNDRED,
            _ => to_decimal(Some(seg)).unwrap_or(Decimal::ZERO),
        },
        seg => to_decimal(seg).unwrap_or(Decimal::ZERO),
    };

    let mut base = subtotal.unwrap_or(Decimal::ZERO) - discount;

    let tax = match raw.tax {
        Some(seg) if seg.contains('%') => Some(
            percent_value(seg)
                .map(|pct| base * pct / Decimal::ONE_HUNDRED)
                .unwrap_or(Decimal::ZERO),
        ),
        seg => to_decimal(seg),
    };

    if subtotal.is_none() {
        subtotal = max_amount(full_text);
        base = subtotal.unwrap_or(Decimal::ZERO) - discount;
    }

    let total = base + tax.unwrap_or(Decimal::ZERO);

    ResolvedAmounts {
        subtotal,
        discount,
        tax,
        total,
    }
}

/// Extract the numeric percentage from a `%`-bearing segment.
fn percent_value(segment: &str) -> Option<Decimal> {
    PERCENT_VALUE
        .captures(segment)
        .and_then(|caps| Decimal::from_str(&caps[1]).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_percentage_discount_and_tax() {
        let raw = RawAmounts {
            subtotal: Some("100.00"),
            discount: Some("10%"),
            tax: Some("8%"),
        };
        let resolved = reconcile(raw, "");

        assert_eq!(resolved.subtotal, Some(dec("100.00")));
        assert_eq!(resolved.discount, dec("10.00"));
        assert_eq!(resolved.tax, Some(dec("7.20")));
        assert_eq!(resolved.total, dec("97.20"));
    }

    #[test]
    fn test_literal_amounts() {
        let raw = RawAmounts {
            subtotal: Some("$200.00"),
            discount: Some("20.00"),
            tax: Some("18.00"),
        };
        let resolved = reconcile(raw, "");

        assert_eq!(resolved.total, dec("198.00"));
    }

    #[test]
    fn test_missing_discount_defaults_to_zero() {
        let raw = RawAmounts {
            subtotal: Some("50.00"),
            discount: None,
            tax: None,
        };
        let resolved = reconcile(raw, "");

        assert_eq!(resolved.discount, Decimal::ZERO);
        assert_eq!(resolved.tax, None);
        assert_eq!(resolved.total, dec("50.00"));
    }

    #[test]
    fn test_percentage_discount_without_subtotal_is_literal() {
        let raw = RawAmounts {
            subtotal: None,
            discount: Some("10%"),
            tax: None,
        };
        let resolved = reconcile(raw, "");

        // Falls back to reading the segment as a literal amount
        assert_eq!(resolved.discount, dec("10"));
    }

    #[test]
    fn test_subtotal_inferred_from_largest_amount() {
        let raw = RawAmounts::default();
        let text = "Item one 45.00\nItem two 12.50\nDeposit 300.00";
        let resolved = reconcile(raw, text);

        assert_eq!(resolved.subtotal, Some(dec("300.00")));
        assert_eq!(resolved.total, dec("300.00"));
    }

    #[test]
    fn test_invariant_holds_exactly() {
        let raw = RawAmounts {
            subtotal: Some("1,234.56"),
            discount: Some("5%"),
            tax: Some("7.5%"),
        };
        let resolved = reconcile(raw, "");

        let subtotal = resolved.subtotal.unwrap();
        let tax = resolved.tax.unwrap();
        assert_eq!(resolved.total, subtotal - resolved.discount + tax);
    }

    #[test]
    fn test_unparseable_percent_tax_is_zero() {
        let raw = RawAmounts {
            subtotal: Some("100.00"),
            discount: None,
            tax: Some("%"),
        };
        let resolved = reconcile(raw, "");

        assert_eq!(resolved.tax, Some(Decimal::ZERO));
        assert_eq!(resolved.total, dec("100.00"));
    }

    #[test]
    fn test_percentage_division_precision() {
        let raw = RawAmounts {
            subtotal: Some("10.00"),
            discount: None,
            tax: Some("3.33%"),
        };
        let resolved = reconcile(raw, "");

        // 10 * 3.33 / 100 keeps full fractional precision
        assert_eq!(resolved.tax, Some(dec("0.3330")));
    }
}
