//! Amount normalization and currency detection.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT, CURRENCY_CODE, CURRENCY_SYMBOL, NUMERIC};

/// Parse a currency-marked numeric segment into an exact decimal.
///
/// Strips thousands separators, currency symbols and whitespace, then takes
/// the first sign-free numeric substring. None for empty or non-numeric input.
pub fn to_decimal(segment: Option<&str>) -> Option<Decimal> {
    let segment = segment?;
    if segment.is_empty() {
        return None;
    }

    let cleaned: String = segment
        .chars()
        .filter(|&c| !matches!(c, ',' | '$' | '€' | '£' | '₹') && !c.is_whitespace())
        .collect();

    let m = NUMERIC.find(&cleaned)?;
    Decimal::from_str(m.as_str()).ok()
}

/// Detect the invoice currency from full text.
///
/// A currency symbol wins over a bare code token; None when neither appears.
pub fn detect_currency(text: &str) -> Option<String> {
    if let Some(m) = CURRENCY_SYMBOL.find(text) {
        let code = match m.as_str() {
            "$" => "USD",
            "€" => "EUR",
            "£" => "GBP",
            "₹" => "INR",
            _ => unreachable!("symbol pattern only matches the mapped set"),
        };
        return Some(code.to_string());
    }

    CURRENCY_CODE
        .find(text)
        .map(|m| m.as_str().to_uppercase())
}

/// Largest monetary amount anywhere in the text.
///
/// Naive fallback used to infer a missing subtotal.
pub fn max_amount(text: &str) -> Option<Decimal> {
    AMOUNT
        .find_iter(text)
        .filter_map(|m| to_decimal(Some(m.as_str())))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_decimal_plain() {
        assert_eq!(to_decimal(Some("1234.56")), Some(dec("1234.56")));
        assert_eq!(to_decimal(Some("42")), Some(dec("42")));
    }

    #[test]
    fn test_to_decimal_strips_separators_and_symbols() {
        assert_eq!(to_decimal(Some("$ 1,234.56")), Some(dec("1234.56")));
        assert_eq!(to_decimal(Some("€1,234.56")), Some(dec("1234.56")));
        assert_eq!(to_decimal(Some("₹ 99,999")), Some(dec("99999")));
    }

    #[test]
    fn test_to_decimal_first_numeric_substring() {
        assert_eq!(to_decimal(Some("USD 45.00 net")), Some(dec("45.00")));
    }

    #[test]
    fn test_to_decimal_none() {
        assert_eq!(to_decimal(None), None);
        assert_eq!(to_decimal(Some("")), None);
        assert_eq!(to_decimal(Some("no amount here")), None);
    }

    #[test]
    fn test_detect_currency_symbol_first() {
        assert_eq!(detect_currency("Total: €1,234.56"), Some("EUR".to_string()));
        assert_eq!(detect_currency("Total: $30.00"), Some("USD".to_string()));
        assert_eq!(detect_currency("£12.00"), Some("GBP".to_string()));
        assert_eq!(detect_currency("₹500"), Some("INR".to_string()));
    }

    #[test]
    fn test_detect_currency_code_fallback() {
        assert_eq!(detect_currency("Amount: 45.00 usd"), Some("USD".to_string()));
        assert_eq!(detect_currency("100.00 AED"), Some("AED".to_string()));
        assert_eq!(detect_currency("plain text"), None);
    }

    #[test]
    fn test_max_amount() {
        let text = "Item 45.00\nShipping 12.50\nGrand 300.00";
        assert_eq!(max_amount(text), Some(dec("300.00")));
    }

    #[test]
    fn test_max_amount_with_thousands() {
        let text = "Deposit 950.00 and balance 1,234.56";
        assert_eq!(max_amount(text), Some(dec("1234.56")));
        assert_eq!(max_amount("no numbers"), None);
    }
}
