//! Daily summary assembly.
//!
//! Takes a resolved plan view (targets copied at generation time, meals
//! with their cached snapshot totals and optional check-ins, extra foods)
//! and produces the day's figures: consumed vs target, remaining (signed),
//! uncapped progress percentages, and the meal completion rate. Consumed
//! totals are always recomputed here from the inputs; nothing is read
//! from a persisted running total.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::macros::{round2, MacroSet, TargetMacros};
use super::reconcile::{effective_macros, meal_state, CheckIn, MealState};

/// `consumed / target * 100`, half-up 2dp, 0 when the target is zero.
pub fn progress_pct(consumed: Decimal, target: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    round2(consumed / target * Decimal::ONE_HUNDRED)
}

/// One meal as the summary builder consumes it.
#[derive(Debug, Clone)]
pub struct MealView {
    pub id: Uuid,
    pub name: String,
    /// Sum of the meal's cached line-item snapshots.
    pub target: MacroSet,
    pub check_in: Option<CheckIn>,
}

/// A resolved plan for one (user, date). `targets` is `None` when the
/// plan was generated without a profile ("not calculated").
#[derive(Debug, Clone, Default)]
pub struct PlanView {
    pub targets: Option<TargetMacros>,
    pub meals: Vec<MealView>,
    pub extras: Vec<MacroSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressPct {
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealBreakdown {
    pub id: Uuid,
    pub name: String,
    pub target: MacroSet,
    pub consumed: MacroSet,
    pub completion_pct: Option<Decimal>,
    pub state: MealState,
    pub satisfaction: Option<i16>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub targets: Option<TargetMacros>,
    pub consumed_from_meals: MacroSet,
    pub consumed_from_extras: MacroSet,
    pub consumed_total: MacroSet,
    /// `target - consumed`; negative values mean overage.
    pub remaining: Option<TargetMacros>,
    pub progress: Option<ProgressPct>,
    pub meals_total: i64,
    pub meals_checked_in: i64,
    pub completion_rate_pct: Decimal,
    pub meals: Vec<MealBreakdown>,
}

pub fn build_daily_summary(plan: &PlanView) -> DailySummary {
    let consumed_from_meals: MacroSet = plan
        .meals
        .iter()
        .map(|m| effective_macros(&m.target, m.check_in.as_ref()))
        .sum();
    let consumed_from_extras: MacroSet = plan.extras.iter().cloned().sum();
    let consumed_total = consumed_from_meals.add(&consumed_from_extras);

    let remaining = plan.targets.as_ref().map(|t| TargetMacros {
        calories: t.calories - consumed_total.calories,
        carbs_g: t.carbs_g - consumed_total.carbs_g,
        protein_g: t.protein_g - consumed_total.protein_g,
        fat_g: t.fat_g - consumed_total.fat_g,
    });
    let progress = plan.targets.as_ref().map(|t| ProgressPct {
        calories: progress_pct(consumed_total.calories, t.calories),
        carbs_g: progress_pct(consumed_total.carbs_g, t.carbs_g),
        protein_g: progress_pct(consumed_total.protein_g, t.protein_g),
        fat_g: progress_pct(consumed_total.fat_g, t.fat_g),
    });

    let meals_total = plan.meals.len() as i64;
    let meals_checked_in = plan.meals.iter().filter(|m| m.check_in.is_some()).count() as i64;
    let completion_rate_pct =
        progress_pct(Decimal::from(meals_checked_in), Decimal::from(meals_total));

    let meals = plan
        .meals
        .iter()
        .map(|m| MealBreakdown {
            id: m.id,
            name: m.name.clone(),
            consumed: effective_macros(&m.target, m.check_in.as_ref()),
            target: m.target.clone(),
            completion_pct: m.check_in.as_ref().map(|c| c.completion_pct),
            state: meal_state(m.check_in.as_ref()),
            satisfaction: m.check_in.as_ref().and_then(|c| c.satisfaction),
        })
        .collect();

    DailySummary {
        targets: plan.targets.clone(),
        consumed_from_meals,
        consumed_from_extras,
        consumed_total,
        remaining,
        progress,
        meals_total,
        meals_checked_in,
        completion_rate_pct,
        meals,
    }
}

/// Status of a day's logged calories against the profile target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalorieStatus {
    Deficit,
    Surplus,
    OnTarget,
}

/// Classification with a caller-supplied tolerance band: anything within
/// `±tolerance` of the target counts as on target.
pub fn classify_calories(consumed: Decimal, target: Decimal, tolerance: Decimal) -> CalorieStatus {
    let diff = consumed - target;
    if diff.abs() <= tolerance {
        CalorieStatus::OnTarget
    } else if diff > Decimal::ZERO {
        CalorieStatus::Surplus
    } else {
        CalorieStatus::Deficit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn meal(name: &str, calories: Decimal, check_in: Option<CheckIn>) -> MealView {
        MealView {
            id: Uuid::new_v4(),
            name: name.into(),
            target: MacroSet {
                calories,
                ..MacroSet::zero()
            },
            check_in,
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
    fn empty_plan_is_all_zero_not_an_error() {
        let summary = build_daily_summary(&PlanView::default());
        assert!(summary.targets.is_none());
        assert!(summary.remaining.is_none());
        assert_eq!(summary.consumed_total, MacroSet::zero());
        assert_eq!(summary.meals_total, 0);
        assert_eq!(summary.completion_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn two_meals_and_an_extra() {
        // 2000 kcal target, 500 kcal meals at 100% and 50%, 150 kcal extra:
        // consumed 900, remaining 1100, progress 45%
        let plan = PlanView {
            targets: Some(TargetMacros {
                calories: dec!(2000),
                carbs_g: dec!(250),
                protein_g: dec!(100),
                fat_g: dec!(67),
            }),
            meals: vec![
                meal("breakfast", dec!(500), Some(check_in(dec!(100)))),
                meal("lunch", dec!(500), Some(check_in(dec!(50)))),
            ],
            extras: vec![MacroSet {
                calories: dec!(150),
                ..MacroSet::zero()
            }],
        };
        let summary = build_daily_summary(&plan);
        assert_eq!(summary.consumed_total.calories, dec!(900.00));
        assert_eq!(summary.remaining.as_ref().unwrap().calories, dec!(1100.00));
        assert_eq!(summary.progress.as_ref().unwrap().calories, dec!(45.00));
        assert_eq!(summary.meals_checked_in, 2);
        assert_eq!(summary.completion_rate_pct, dec!(100.00));
    }

    #[test]
    fn remaining_goes_negative_on_overage() {
        let plan = PlanView {
            targets: Some(TargetMacros {
                calories: dec!(500),
                ..TargetMacros::default()
            }),
            meals: vec![meal("feast", dec!(800), Some(check_in(dec!(100))))],
            extras: vec![],
        };
        let summary = build_daily_summary(&plan);
        assert_eq!(summary.remaining.as_ref().unwrap().calories, dec!(-300.00));
        assert_eq!(summary.progress.as_ref().unwrap().calories, dec!(160.00));
    }

    #[test]
    fn zero_target_progress_is_zero_not_nan() {
        let plan = PlanView {
            targets: Some(TargetMacros::default()),
            meals: vec![meal("snack", dec!(100), Some(check_in(dec!(100))))],
            extras: vec![],
        };
        let summary = build_daily_summary(&plan);
        assert_eq!(summary.progress.as_ref().unwrap().calories, Decimal::ZERO);
    }

    #[test]
    fn completion_rate_counts_check_ins() {
        let plan = PlanView {
            targets: None,
            meals: vec![
                meal("a", dec!(100), Some(check_in(dec!(0)))),
                meal("b", dec!(100), None),
                meal("c", dec!(100), None),
            ],
            extras: vec![],
        };
        let summary = build_daily_summary(&plan);
        // A 0% check-in still counts as checked in
        assert_eq!(summary.meals_checked_in, 1);
        assert_eq!(summary.completion_rate_pct, dec!(33.33));
    }

    #[test]
    fn planned_meals_do_not_count_as_consumed() {
        let plan = PlanView {
            targets: None,
            meals: vec![meal("dinner", dec!(700), None)],
            extras: vec![],
        };
        let summary = build_daily_summary(&plan);
        assert_eq!(summary.consumed_total, MacroSet::zero());
        assert_eq!(summary.meals[0].state, MealState::Planned);
    }

    #[test]
    fn calorie_status_with_tolerance_band() {
        assert_eq!(
            classify_calories(dec!(1800), dec!(2000), Decimal::ZERO),
            CalorieStatus::Deficit
        );
        assert_eq!(
            classify_calories(dec!(2100), dec!(2000), Decimal::ZERO),
            CalorieStatus::Surplus
        );
        assert_eq!(
            classify_calories(dec!(2000), dec!(2000), Decimal::ZERO),
            CalorieStatus::OnTarget
        );
        assert_eq!(
            classify_calories(dec!(2040), dec!(2000), dec!(50)),
            CalorieStatus::OnTarget
        );
    }
}
