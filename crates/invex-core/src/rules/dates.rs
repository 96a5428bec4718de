//! Date normalization for loosely formatted invoice text.

use chrono::NaiveDate;

use super::patterns::{DATE_MONTH_NAME, DATE_NUMERIC, DATE_YMD};

/// Parse a loosely formatted date segment.
///
/// Handles ISO `YYYY-MM-DD`, numeric `D/M/Y` with `/`, `-` or `.` separators,
/// and English month names. `day_first` resolves ambiguous numeric orderings;
/// a component greater than 12 forces the other interpretation. Returns None
/// for unparseable input, never panics.
pub fn parse_date(segment: &str, day_first: bool) -> Option<NaiveDate> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    if let Some(caps) = DATE_YMD.captures(segment) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_NUMERIC.captures(segment) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = pivot_year(&caps[3]);

        let (day, month) = if first > 12 {
            (first, second)
        } else if second > 12 {
            (second, first)
        } else if day_first {
            (first, second)
        } else {
            (second, first)
        };

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
        // Chosen order produced an invalid date, try the swap
        if let Some(date) = NaiveDate::from_ymd_opt(year, day, month) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_MONTH_NAME.captures(segment) {
        let year: i32 = caps[5].parse().ok()?;
        let (day, month_name) = match (caps.get(1), caps.get(3)) {
            (Some(d), _) => (d.as_str(), &caps[2]),
            (None, Some(m)) => (&caps[4], m.as_str()),
            _ => return None,
        };
        let day: u32 = day.parse().ok()?;
        let month = month_from_name(month_name)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Scan lines for a date near a labeled field.
///
/// On a line containing any alias (case-insensitive), searches the tail after
/// the alias, then the whole line, then up to `window` subsequent non-blank
/// lines for a strict numeric date. First match wins.
pub fn find_date_near_label(
    lines: &[&str],
    aliases: &[String],
    window: usize,
    day_first: bool,
) -> Option<NaiveDate> {
    let aliases: Vec<String> = aliases.iter().map(|a| a.to_lowercase()).collect();

    for (idx, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if !aliases.iter().any(|a| lower.contains(a.as_str())) {
            continue;
        }

        // Tail of line after the last alias occurrence
        let label_end = aliases
            .iter()
            .filter_map(|a| lower.find(a.as_str()).map(|pos| pos + a.len()))
            .max()
            .unwrap_or(0);
        // Offsets come from the lowercased copy; fall back to the whole line
        // when case folding shifted byte boundaries.
        let tail = line.get(label_end..).unwrap_or(line);
        if let Some(m) = DATE_NUMERIC.find(tail) {
            if let Some(date) = parse_date(m.as_str(), day_first) {
                return Some(date);
            }
        }

        // Whole line
        if let Some(m) = DATE_NUMERIC.find(line) {
            if let Some(date) = parse_date(m.as_str(), day_first) {
                return Some(date);
            }
        }

        // Downward sweep over the next non-blank lines
        let mut steps = 0;
        for probe in lines.iter().skip(idx + 1) {
            if steps >= window {
                break;
            }
            let probe = probe.trim();
            if probe.is_empty() {
                continue;
            }
            if let Some(m) = DATE_NUMERIC.find(probe) {
                if let Some(date) = parse_date(m.as_str(), day_first) {
                    return Some(date);
                }
            }
            steps += 1;
        }
    }

    None
}

fn pivot_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: 00-50 map to the 2000s
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let months = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];

    months
        .iter()
        .position(|m| *m == name || (name.len() >= 3 && m.starts_with(&name)))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2024-01-15", true), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024/01/15", true), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("05/03/2024", true), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("05/03/2024", false), Some(date(2024, 5, 3)));
    }

    #[test]
    fn test_parse_date_unambiguous_overrides_order() {
        // 15 cannot be a month regardless of configuration
        assert_eq!(parse_date("15/03/2024", false), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("03/15/2024", true), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("15.01.24", true), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15.01.99", true), Some(date(1999, 1, 15)));
    }

    #[test]
    fn test_parse_date_month_name() {
        assert_eq!(parse_date("January 15, 2024", true), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15 January 2024", true), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15 Jan 2024", true), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("", true), None);
        assert_eq!(parse_date("not a date", true), None);
        assert_eq!(parse_date("99/99/2024", true), None);
    }

    #[test]
    fn test_find_date_in_tail() {
        let lines = ["Invoice Date: 15/01/2024", "Due Date: 29/01/2024"];
        let aliases = vec!["invoice date".to_string()];

        assert_eq!(
            find_date_near_label(&lines, &aliases, 5, true),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_find_date_on_following_line() {
        let lines = ["Invoice Date", "", "15/01/2024"];
        let aliases = vec!["invoice date".to_string()];

        assert_eq!(
            find_date_near_label(&lines, &aliases, 5, true),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_find_date_respects_window() {
        let lines = ["Due Date", "a", "b", "c", "d", "e", "29/01/2024"];
        let aliases = vec!["due date".to_string()];

        assert_eq!(find_date_near_label(&lines, &aliases, 5, true), None);
    }

    #[test]
    fn test_find_date_no_alias() {
        let lines = ["nothing here", "15/01/2024"];
        let aliases = vec!["due date".to_string()];

        assert_eq!(find_date_near_label(&lines, &aliases, 5, true), None);
    }
}
