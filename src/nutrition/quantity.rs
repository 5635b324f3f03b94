//! Quantity-to-basis normalization.
//!
//! Food nutrition is stored per 100g (or 100ml); a line item carries a
//! quantity and a unit. This module turns that pair into a multiplier
//! against the basis and produces the per-item macro snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::macros::MacroSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Milliliters,
    Portion,
}

impl Unit {
    pub fn parse(s: &str) -> Option<Unit> {
        match s {
            "g" => Some(Unit::Grams),
            "ml" => Some(Unit::Milliliters),
            "portion" => Some(Unit::Portion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Milliliters => "ml",
            Unit::Portion => "portion",
        }
    }
}

/// Scaling factor against a per-100g basis. A portion only means something
/// when the food defines a positive serving size; otherwise the quantity
/// is treated as grams/ml.
pub fn multiplier(quantity: Decimal, unit: Unit, serving_size_g: Option<Decimal>) -> Decimal {
    match (unit, serving_size_g) {
        (Unit::Portion, Some(serving)) if serving > Decimal::ZERO => {
            quantity * serving / Decimal::ONE_HUNDRED
        }
        _ => quantity / Decimal::ONE_HUNDRED,
    }
}

/// Per-item macro snapshot: basis scaled by the quantity multiplier,
/// each field rounded half-up to 2dp independently.
pub fn scale_basis(
    basis: &MacroSet,
    quantity: Decimal,
    unit: Unit,
    serving_size_g: Option<Decimal>,
) -> MacroSet {
    basis.scale(multiplier(quantity, unit, serving_size_g))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn basis() -> MacroSet {
        MacroSet {
            calories: dec!(250),
            carbs_g: dec!(30.5),
            protein_g: dec!(12),
            fat_g: dec!(8.2),
            fiber_g: dec!(3),
            sugar_g: dec!(10),
            sodium_mg: dec!(400),
            saturated_fat_g: dec!(2.5),
        }
    }

    #[test]
    fn grams_scale_against_per_100g() {
        let snap = scale_basis(&basis(), dec!(150), Unit::Grams, None);
        assert_eq!(snap.calories, dec!(375.00));
        assert_eq!(snap.carbs_g, dec!(45.75));
        assert_eq!(snap.sodium_mg, dec!(600.00));
    }

    #[test]
    fn portion_uses_serving_size() {
        // 2 portions of a 60g serving = 120g
        let snap = scale_basis(&basis(), dec!(2), Unit::Portion, Some(dec!(60)));
        assert_eq!(snap.calories, dec!(300.00));
        assert_eq!(snap.protein_g, dec!(14.40));
    }

    #[test]
    fn portion_without_serving_size_falls_back_to_grams() {
        let with_zero = scale_basis(&basis(), dec!(50), Unit::Portion, Some(dec!(0)));
        let plain = scale_basis(&basis(), dec!(50), Unit::Grams, None);
        assert_eq!(with_zero, plain);

        let with_none = scale_basis(&basis(), dec!(50), Unit::Portion, None);
        assert_eq!(with_none, plain);
    }

    #[test]
    fn unit_parse_roundtrip() {
        for s in ["g", "ml", "portion"] {
            assert_eq!(Unit::parse(s).map(|u| u.as_str()), Some(s));
        }
        assert!(Unit::parse("cups").is_none());
    }
}
