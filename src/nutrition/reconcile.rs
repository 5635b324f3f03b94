//! Consumption reconciliation.
//!
//! A meal is Planned until its (unique) check-in exists; re-checking-in
//! updates the existing record, it never creates a second one. The
//! check-in's completion percentage drives the effective macros counted
//! toward the day, unless an explicit per-field actual override is set.
//!
//! Line-item consumption (consumed flag + consumed quantity on a meal
//! food) is an independent, parallel model: it scales the item's cached
//! snapshot, and it never feeds the daily summary.

use rust_decimal::Decimal;
use serde::Serialize;

use super::macros::{round2, MacroSet};

/// A meal's check-in as the reconciler sees it.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub completion_pct: Decimal,
    pub actual_calories: Option<Decimal>,
    pub actual_carbs_g: Option<Decimal>,
    pub actual_protein_g: Option<Decimal>,
    pub actual_fat_g: Option<Decimal>,
    pub satisfaction: Option<i16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealState {
    Planned,
    PartiallyConsumed,
    FullyConsumed,
    NotConsumed,
}

pub fn meal_state(check_in: Option<&CheckIn>) -> MealState {
    let Some(ci) = check_in else {
        return MealState::Planned;
    };
    if ci.completion_pct >= Decimal::ONE_HUNDRED {
        MealState::FullyConsumed
    } else if ci.completion_pct > Decimal::ZERO {
        MealState::PartiallyConsumed
    } else {
        MealState::NotConsumed
    }
}

/// Effective macros counted toward daily consumption. A meal without a
/// check-in contributes nothing. With one, each overridable field takes
/// the explicit actual value when present, otherwise target scaled by
/// the completion percentage; the remaining fields always scale.
pub fn effective_macros(target: &MacroSet, check_in: Option<&CheckIn>) -> MacroSet {
    let Some(ci) = check_in else {
        return MacroSet::zero();
    };
    let scaled = |t: Decimal| round2(t * ci.completion_pct / Decimal::ONE_HUNDRED);
    MacroSet {
        calories: ci.actual_calories.unwrap_or_else(|| scaled(target.calories)),
        carbs_g: ci.actual_carbs_g.unwrap_or_else(|| scaled(target.carbs_g)),
        protein_g: ci.actual_protein_g.unwrap_or_else(|| scaled(target.protein_g)),
        fat_g: ci.actual_fat_g.unwrap_or_else(|| scaled(target.fat_g)),
        fiber_g: scaled(target.fiber_g),
        sugar_g: scaled(target.sugar_g),
        sodium_mg: scaled(target.sodium_mg),
        saturated_fat_g: scaled(target.saturated_fat_g),
    }
}

/// Line-item actual macros: snapshot scaled by consumed/planned quantity.
/// Zero when the item is not marked consumed, the consumed quantity is
/// absent, or the planned quantity is zero.
pub fn line_item_actual(
    snapshot: &MacroSet,
    planned_quantity: Decimal,
    consumed: bool,
    consumed_quantity: Option<Decimal>,
) -> MacroSet {
    if !consumed || planned_quantity.is_zero() {
        return MacroSet::zero();
    }
    match consumed_quantity {
        Some(qty) => snapshot.scale(qty / planned_quantity),
        None => MacroSet::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn target() -> MacroSet {
        MacroSet {
            calories: dec!(500),
            carbs_g: dec!(60),
            protein_g: dec!(25),
            fat_g: dec!(18),
            fiber_g: dec!(6),
            sugar_g: dec!(12),
            sodium_mg: dec!(800),
            saturated_fat_g: dec!(5),
        }
    }

    fn check_in(pct: Decimal) -> CheckIn {
        CheckIn {
            completion_pct: pct,
            actual_calories: None,
            actual_carbs_g: None,
            actual_protein_g: None,
            actual_fat_g: None,
            satisfaction: None,
        }
    }

    #[test]
    fn no_check_in_contributes_nothing() {
        assert_eq!(effective_macros(&target(), None), MacroSet::zero());
        assert_eq!(meal_state(None), MealState::Planned);
    }

    #[test]
    fn full_completion_is_idempotent() {
        let ci = check_in(dec!(100));
        assert_eq!(effective_macros(&target(), Some(&ci)), target());
        assert_eq!(meal_state(Some(&ci)), MealState::FullyConsumed);
    }

    #[test]
    fn zero_completion_zeroes_everything() {
        let ci = check_in(dec!(0));
        assert_eq!(effective_macros(&target(), Some(&ci)), MacroSet::zero());
        assert_eq!(meal_state(Some(&ci)), MealState::NotConsumed);
    }

    #[test]
    fn partial_completion_scales_all_fields() {
        let ci = check_in(dec!(50));
        let eff = effective_macros(&target(), Some(&ci));
        assert_eq!(eff.calories, dec!(250.00));
        assert_eq!(eff.sodium_mg, dec!(400.00));
        assert_eq!(eff.saturated_fat_g, dec!(2.50));
        assert_eq!(meal_state(Some(&ci)), MealState::PartiallyConsumed);
    }

    #[test]
    fn overrides_win_per_field() {
        let mut ci = check_in(dec!(50));
        ci.actual_calories = Some(dec!(420));
        ci.actual_protein_g = Some(dec!(30));
        let eff = effective_macros(&target(), Some(&ci));
        assert_eq!(eff.calories, dec!(420));
        assert_eq!(eff.protein_g, dec!(30));
        // Non-overridden fields still follow the percentage
        assert_eq!(eff.carbs_g, dec!(30.00));
        assert_eq!(eff.fat_g, dec!(9.00));
    }

    #[test]
    fn line_item_scales_by_consumed_over_planned() {
        let snap = MacroSet {
            calories: dec!(375),
            ..MacroSet::zero()
        };
        let actual = line_item_actual(&snap, dec!(150), true, Some(dec!(100)));
        assert_eq!(actual.calories, dec!(250.00));
    }

    #[test]
    fn line_item_zero_without_consumption_data() {
        let snap = MacroSet {
            calories: dec!(375),
            ..MacroSet::zero()
        };
        assert_eq!(
            line_item_actual(&snap, dec!(150), false, Some(dec!(100))),
            MacroSet::zero()
        );
        assert_eq!(line_item_actual(&snap, dec!(150), true, None), MacroSet::zero());
        assert_eq!(
            line_item_actual(&snap, dec!(0), true, Some(dec!(50))),
            MacroSet::zero()
        );
    }
}
