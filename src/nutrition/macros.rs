//! Shared macronutrient value object.
//!
//! All figures are fixed-point `Decimal`, rounded half-up to 2 decimal
//! places wherever a multiplication or division happens, so repeated
//! summation never accumulates binary-float drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Half-up rounding to 2 decimal places, used for every derived figure.
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One set of macro figures (a food basis, a line-item snapshot, a meal
/// total, a daily total — same shape everywhere).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSet {
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
    pub fiber_g: Decimal,
    pub sugar_g: Decimal,
    pub sodium_mg: Decimal,
    pub saturated_fat_g: Decimal,
}

impl MacroSet {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add(&self, other: &MacroSet) -> MacroSet {
        MacroSet {
            calories: self.calories + other.calories,
            carbs_g: self.carbs_g + other.carbs_g,
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            fiber_g: self.fiber_g + other.fiber_g,
            sugar_g: self.sugar_g + other.sugar_g,
            sodium_mg: self.sodium_mg + other.sodium_mg,
            saturated_fat_g: self.saturated_fat_g + other.saturated_fat_g,
        }
    }

    /// Scale every field by `multiplier`, rounding each result half-up 2dp.
    pub fn scale(&self, multiplier: Decimal) -> MacroSet {
        MacroSet {
            calories: round2(self.calories * multiplier),
            carbs_g: round2(self.carbs_g * multiplier),
            protein_g: round2(self.protein_g * multiplier),
            fat_g: round2(self.fat_g * multiplier),
            fiber_g: round2(self.fiber_g * multiplier),
            sugar_g: round2(self.sugar_g * multiplier),
            sodium_mg: round2(self.sodium_mg * multiplier),
            saturated_fat_g: round2(self.saturated_fat_g * multiplier),
        }
    }
}

impl std::ops::Add for MacroSet {
    type Output = MacroSet;

    fn add(self, other: MacroSet) -> MacroSet {
        MacroSet::add(&self, &other)
    }
}

impl std::iter::Sum for MacroSet {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MacroSet::zero(), |acc, m| acc + m)
    }
}

/// The four targeted macros a plan tracks against. Also reused for the
/// `remaining = target - consumed` delta, which may go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMacros {
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(1.004)), dec!(1.00));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn sum_over_empty_is_zero() {
        let total: MacroSet = std::iter::empty().sum();
        assert_eq!(total, MacroSet::zero());
    }

    #[test]
    fn scale_rounds_each_field() {
        let basis = MacroSet {
            calories: dec!(123.45),
            protein_g: dec!(3.33),
            ..MacroSet::zero()
        };
        let scaled = basis.scale(dec!(0.5));
        assert_eq!(scaled.calories, dec!(61.73)); // 61.725 rounds up
        assert_eq!(scaled.protein_g, dec!(1.67)); // 1.665 rounds up
        assert_eq!(scaled.fat_g, dec!(0));
    }
}
