//! # Unit Converter
//!
//! Converts quantities between canonical units using a fixed, directed table
//! of direct factors. Factors are never composed: `tsp -> l` has no entry and
//! does not go through `ml`. Volume and weight units never convert into each
//! other.

use crate::unit_normalizer::CanonicalUnit;

/// Direct conversion factor from one canonical unit to another
///
/// Returns `None` when the table has no entry for the pair. Identical units
/// are handled by [`convert_unit`], not by the table.
pub fn conversion_factor(from: &CanonicalUnit, to: &CanonicalUnit) -> Option<f64> {
    use CanonicalUnit::*;

    // No density model: volume and weight never meet
    if (from.is_volume() && to.is_weight()) || (from.is_weight() && to.is_volume()) {
        return None;
    }

    let factor = match (from, to) {
        (Teaspoon, Tablespoon) => 1.0 / 3.0,
        (Teaspoon, Cup) => 1.0 / 48.0,
        (Teaspoon, Milliliter) => 5.0,

        (Tablespoon, Teaspoon) => 3.0,
        (Tablespoon, Cup) => 1.0 / 16.0,
        (Tablespoon, Milliliter) => 15.0,

        (Cup, Teaspoon) => 48.0,
        (Cup, Tablespoon) => 16.0,
        (Cup, Milliliter) => 240.0,

        (Milliliter, Liter) => 1.0 / 1000.0,
        (Milliliter, Teaspoon) => 1.0 / 5.0,
        (Milliliter, Tablespoon) => 1.0 / 15.0,
        (Milliliter, Cup) => 1.0 / 240.0,

        (Liter, Milliliter) => 1000.0,

        (Ounce, Gram) => 28.35,
        (Ounce, Pound) => 1.0 / 16.0,

        (Pound, Ounce) => 16.0,
        (Pound, Gram) => 453.59,

        (Gram, Ounce) => 1.0 / 28.35,
        (Gram, Kilogram) => 1.0 / 1000.0,
        (Gram, Pound) => 1.0 / 453.59,

        (Kilogram, Gram) => 1000.0,
        (Kilogram, Pound) => 2.20462,

        _ => return None,
    };

    Some(factor)
}

/// Convert `quantity` from one canonical unit token to another
///
/// Identical units return the quantity unchanged. When the table has no
/// direct factor the quantity is also returned unchanged; callers detect the
/// failed conversion by comparing the result with the input.
///
/// # Examples
///
/// ```rust
/// use meal_planner::unit_converter::convert_unit;
///
/// assert_eq!(convert_unit(2.0, "cup", "ml"), 480.0);
/// assert_eq!(convert_unit(1.0, "cup", "g"), 1.0);
/// ```
pub fn convert_unit(quantity: f64, from_unit: &str, to_unit: &str) -> f64 {
    if from_unit == to_unit {
        return quantity;
    }

    let from = CanonicalUnit::from_token(from_unit);
    let to = CanonicalUnit::from_token(to_unit);

    match conversion_factor(&from, &to) {
        Some(factor) => quantity * factor,
        None => quantity,
    }
}
