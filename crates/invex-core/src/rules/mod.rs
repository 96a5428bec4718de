//! Rule-based extraction primitives.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod labels;
pub mod patterns;
pub mod totals;

pub use amounts::{detect_currency, max_amount, to_decimal};
pub use dates::{find_date_near_label, parse_date};
pub use items::extract_line_items;
pub use labels::{LabelLocator, LabelMatch};
pub use totals::{reconcile, RawAmounts, ResolvedAmounts};
