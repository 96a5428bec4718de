//! Line-item extraction from tabular text rows.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::invoice::LineItem;

use super::patterns::LINE_ITEM;

/// Extract line items matching `<description> <qty> <rate> <amount>`.
///
/// Non-matching lines are silently skipped; item order follows line order.
pub fn extract_line_items(lines: &[&str]) -> Vec<LineItem> {
    let mut items = Vec::new();

    for line in lines {
        let Some(caps) = LINE_ITEM.captures(line.trim()) else {
            continue;
        };

        let quantity: u32 = match caps[2].parse() {
            Ok(q) => q,
            Err(_) => continue,
        };
        let (Ok(rate), Ok(amount)) = (
            Decimal::from_str(&caps[3].replace(',', "")),
            Decimal::from_str(&caps[4].replace(',', "")),
        ) else {
            continue;
        };

        items.push(LineItem {
            description: caps[1].trim().to_string(),
            quantity,
            rate,
            amount,
        });
    }

    items
}
