//! # Quantity Parser
//!
//! Splits a human-written measure string into a numeric quantity and the unit
//! text that follows it.
//!
//! ## Features
//!
//! - Decimals and integers ("1.5", "2")
//! - Simple fractions ("1/2")
//! - Leading number followed by free text ("2 cups chopped")
//! - Failure-tolerant: text without a numeric prefix becomes a zero quantity
//!   whose unit is the whole string
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::quantity_parser::parse_quantity;
//!
//! let parsed = parse_quantity("1/2 cup");
//! assert_eq!(parsed.quantity, 0.5);
//! assert_eq!(parsed.unit, "cup");
//! ```

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::ingredient_model::ParsedQuantity;

// Leading run of ASCII digits, dots and slashes, then the unit text.
// `\d` would also accept non-ASCII digits that f64 parsing rejects.
const MEASURE_PATTERN: &str = r"(?s)^([0-9/.]+)\s*(.*)$";

// Longest decimal prefix of a numeric run, e.g. "1.5" in "1.5.2"
const DECIMAL_PREFIX_PATTERN: &str = r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)";

lazy_static! {
    static ref MEASURE_REGEX: Regex =
        Regex::new(MEASURE_PATTERN).expect("Measure pattern should be valid");
    static ref DECIMAL_PREFIX_REGEX: Regex =
        Regex::new(DECIMAL_PREFIX_PATTERN).expect("Decimal prefix pattern should be valid");
}

/// Parse a measure string into a quantity and unit
///
/// Never fails. Measures without a numeric prefix ("to taste", "") yield a
/// quantity of `0.0` with the trimmed measure as unit. Malformed fractions
/// ("/2", "1/") yield `NaN`; the formatter renders `NaN` as zero.
///
/// # Examples
///
/// ```rust
/// use meal_planner::quantity_parser::parse_quantity;
///
/// let parsed = parse_quantity("2 cups chopped");
/// assert_eq!(parsed.quantity, 2.0);
/// assert_eq!(parsed.unit, "cups chopped");
///
/// let parsed = parse_quantity("to taste");
/// assert_eq!(parsed.quantity, 0.0);
/// assert_eq!(parsed.unit, "to taste");
/// ```
pub fn parse_quantity(measure: &str) -> ParsedQuantity {
    let measure = measure.trim();

    let Some(captures) = MEASURE_REGEX.captures(measure) else {
        trace!("No numeric prefix in measure '{}'", measure);
        return ParsedQuantity {
            quantity: 0.0,
            unit: measure.to_string(),
        };
    };

    let numeric = &captures[1];
    let quantity = match numeric.split_once('/') {
        Some((numerator, denominator)) => {
            parse_decimal_prefix(numerator) / parse_decimal_prefix(denominator)
        }
        None => parse_decimal_prefix(numeric),
    };
    let unit = captures[2].trim().to_string();

    trace!(
        "Parsed measure '{}' -> quantity={}, unit='{}'",
        measure,
        quantity,
        unit
    );

    ParsedQuantity { quantity, unit }
}

/// Parse the longest decimal prefix of `text`, or `NaN` if there is none
fn parse_decimal_prefix(text: &str) -> f64 {
    DECIMAL_PREFIX_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
