//! # Quantity Formatter
//!
//! Renders a merged quantity and unit back into a display measure, rounded to
//! one decimal place.

/// Render a quantity and unit as a display string
///
/// Whole values print without a decimal point, everything else with exactly
/// one decimal digit. Non-finite quantities (from malformed fractions) print
/// as zero. The unit is appended after a single space as given.
///
/// # Examples
///
/// ```rust
/// use meal_planner::quantity_formatter::format_quantity;
///
/// assert_eq!(format_quantity(2.0, "g"), "2 g");
/// assert_eq!(format_quantity(1.333, "tbsp"), "1.3 tbsp");
/// assert_eq!(format_quantity(f64::NAN, "cup"), "0 cup");
/// ```
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    let quantity = if quantity.is_finite() { quantity } else { 0.0 };
    let mut rounded = (quantity * 10.0).round() / 10.0;
    if rounded == 0.0 {
        // avoid printing "-0"
        rounded = 0.0;
    }

    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, unit)
    } else {
        format!("{:.1} {}", rounded, unit)
    }
}
