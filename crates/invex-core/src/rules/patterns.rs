//! Common regex patterns for invoice text extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric substring inside an already-stripped amount segment
    pub static ref NUMERIC: Regex = Regex::new(
        r"\d+(?:\.\d+)?"
    ).unwrap();

    // Currency symbols mapped to ISO codes
    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(
        r"[$€£₹]"
    ).unwrap();

    pub static ref CURRENCY_CODE: Regex = Regex::new(
        r"(?i)\b(USD|EUR|GBP|INR|AED|CAD|AUD)\b"
    ).unwrap();

    // Free-standing monetary amount, optional symbol and thousands separators
    pub static ref AMOUNT: Regex = Regex::new(
        r"[$€£₹]?\s*\d+(?:,\d{3})*(?:\.\d{1,6})?"
    ).unwrap();

    // Strict numeric date: D{1,2} sep D{1,2} sep D{2,4}
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})\b"
    ).unwrap();

    // English long/abbreviated month forms: "January 15, 2024" / "15 Jan 2024"
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(?:(\d{1,2})\s+([A-Za-z]{3,9})|([A-Za-z]{3,9})\s+(\d{1,2})),?\s+(\d{4})\b"
    ).unwrap();

    // Percentage value inside a raw discount/tax segment
    pub static ref PERCENT_VALUE: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)"
    ).unwrap();

    // Tabular line item: description, integer quantity, rate, amount
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"^(.*?)\s+(\d+)\s+([0-9,]+(?:\.\d{1,4})?)\s+([0-9,]+(?:\.\d{1,4})?)$"
    ).unwrap();

    // Text normalization
    pub static ref SPACE_RUNS: Regex = Regex::new(
        r"[ \t]{2,}"
    ).unwrap();

    pub static ref LINE_ENDINGS: Regex = Regex::new(
        r"\r\n?"
    ).unwrap();

    // Stripped when normalizing a line for label containment checks
    pub static ref NON_ALNUM: Regex = Regex::new(
        r"[^a-z0-9]"
    ).unwrap();
}
