//! # Unit Normalizer
//!
//! Maps unit synonyms and abbreviations to canonical unit tokens. Tokens that
//! are not known units (e.g. "eggs", "cloves") pass through lowercased and
//! trimmed so they still work as stable merge and display tokens.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Unit synonyms and their canonical tokens
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    map.insert("t", "tsp");
    map.insert("tsp", "tsp");
    map.insert("teaspoon", "tsp");
    map.insert("teaspoons", "tsp");
    map.insert("tbsp", "tbsp");
    map.insert("tablespoon", "tbsp");
    map.insert("tablespoons", "tbsp");
    map.insert("c", "cup");
    map.insert("cup", "cup");
    map.insert("cups", "cup");
    map.insert("ml", "ml");
    map.insert("milliliter", "ml");
    map.insert("milliliters", "ml");
    map.insert("l", "l");
    map.insert("liter", "l");
    map.insert("liters", "l");

    // Weight units
    map.insert("oz", "oz");
    map.insert("ounce", "oz");
    map.insert("ounces", "oz");
    map.insert("lb", "lb");
    map.insert("pound", "lb");
    map.insert("pounds", "lb");
    map.insert("g", "g");
    map.insert("gram", "g");
    map.insert("grams", "g");
    map.insert("kg", "kg");
    map.insert("kilogram", "kg");
    map.insert("kilograms", "kg");

    map
});

/// Canonical measurement units known to the converter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalUnit {
    // Volume units
    Teaspoon,
    Tablespoon,
    Cup,
    Milliliter,
    Liter,

    // Weight units
    Ounce,
    Pound,
    Gram,
    Kilogram,

    /// Any other token; equal only to itself and never convertible
    Other(String),
}

/// Normalize a unit string to its canonical token
///
/// # Examples
///
/// ```rust
/// use meal_planner::unit_normalizer::normalize_unit;
///
/// assert_eq!(normalize_unit(" Tablespoons "), "tbsp");
/// assert_eq!(normalize_unit("C"), "cup");
/// assert_eq!(normalize_unit("Cloves"), "cloves");
/// ```
pub fn normalize_unit(unit: &str) -> String {
    let normalized = unit.trim().to_lowercase();

    match UNIT_MAPPINGS.get(normalized.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => normalized,
    }
}

impl CanonicalUnit {
    /// Interpret an already-normalized token. Only exact canonical tokens are
    /// recognized; synonyms must go through [`normalize_unit`] first.
    pub fn from_token(token: &str) -> Self {
        match token {
            "tsp" => CanonicalUnit::Teaspoon,
            "tbsp" => CanonicalUnit::Tablespoon,
            "cup" => CanonicalUnit::Cup,
            "ml" => CanonicalUnit::Milliliter,
            "l" => CanonicalUnit::Liter,
            "oz" => CanonicalUnit::Ounce,
            "lb" => CanonicalUnit::Pound,
            "g" => CanonicalUnit::Gram,
            "kg" => CanonicalUnit::Kilogram,
            other => CanonicalUnit::Other(other.to_string()),
        }
    }

    /// The canonical token for this unit
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalUnit::Teaspoon => "tsp",
            CanonicalUnit::Tablespoon => "tbsp",
            CanonicalUnit::Cup => "cup",
            CanonicalUnit::Milliliter => "ml",
            CanonicalUnit::Liter => "l",
            CanonicalUnit::Ounce => "oz",
            CanonicalUnit::Pound => "lb",
            CanonicalUnit::Gram => "g",
            CanonicalUnit::Kilogram => "kg",
            CanonicalUnit::Other(token) => token,
        }
    }

    /// Check if this is a volume unit
    pub fn is_volume(&self) -> bool {
        matches!(
            self,
            CanonicalUnit::Teaspoon
                | CanonicalUnit::Tablespoon
                | CanonicalUnit::Cup
                | CanonicalUnit::Milliliter
                | CanonicalUnit::Liter
        )
    }

    /// Check if this is a weight unit
    pub fn is_weight(&self) -> bool {
        matches!(
            self,
            CanonicalUnit::Ounce
                | CanonicalUnit::Pound
                | CanonicalUnit::Gram
                | CanonicalUnit::Kilogram
        )
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_synonyms() {
        assert_eq!(normalize_unit("teaspoon"), "tsp");
        assert_eq!(normalize_unit("Teaspoons"), "tsp");
        assert_eq!(normalize_unit("t"), "tsp");
        assert_eq!(normalize_unit("tablespoon"), "tbsp");
        assert_eq!(normalize_unit("ounces"), "oz");
        assert_eq!(normalize_unit("Pound"), "lb");
        assert_eq!(normalize_unit("grams"), "g");
        assert_eq!(normalize_unit("kilograms"), "kg");
        assert_eq!(normalize_unit("milliliters"), "ml");
        assert_eq!(normalize_unit("Liter"), "l");
        assert_eq!(normalize_unit("cups"), "cup");
        assert_eq!(normalize_unit("c"), "cup");
    }

    #[test]
    fn test_unknown_units_pass_through() {
        assert_eq!(normalize_unit(" Eggs "), "eggs");
        assert_eq!(normalize_unit("cloves"), "cloves");
        assert_eq!(normalize_unit(""), "");
        // Only the listed spellings are synonyms
        assert_eq!(normalize_unit("lbs"), "lbs");
        assert_eq!(normalize_unit("T"), "tsp");
    }

    #[test]
    fn test_canonical_unit_round_trip() {
        for token in ["tsp", "tbsp", "cup", "ml", "l", "oz", "lb", "g", "kg"] {
            let unit = CanonicalUnit::from_token(token);
            assert!(!matches!(unit, CanonicalUnit::Other(_)), "{token} should be canonical");
            assert_eq!(unit.as_str(), token);
        }
    }

    #[test]
    fn test_from_token_does_not_normalize() {
        assert_eq!(
            CanonicalUnit::from_token("tablespoon"),
            CanonicalUnit::Other("tablespoon".to_string())
        );
        assert_eq!(
            CanonicalUnit::from_token(&normalize_unit("tablespoon")),
            CanonicalUnit::Tablespoon
        );
    }

    #[test]
    fn test_unit_families() {
        assert!(CanonicalUnit::Cup.is_volume());
        assert!(!CanonicalUnit::Cup.is_weight());
        assert!(CanonicalUnit::Gram.is_weight());
        assert!(!CanonicalUnit::Gram.is_volume());

        let eggs = CanonicalUnit::Other("eggs".to_string());
        assert!(!eggs.is_volume());
        assert!(!eggs.is_weight());
    }
}
