//! Derived-target recomputation. Runs on every profile create, edit and
//! weight change, so the stored BMR/TDEE/target columns never go stale.

use rust_decimal::Decimal;
use time::Date;

use crate::error::ApiError;
use crate::nutrition::formula::{
    self, Adjustment, Gender, GoalPolicy,
};

use super::repo::GoalConfig;

#[derive(Debug, Clone, Copy)]
pub struct DerivedTargets {
    pub bmr: Decimal,
    pub tdee: Decimal,
    pub daily_calorie_target: Decimal,
    pub daily_water_target_ml: Decimal,
}

/// Map a `goal_configs` row onto the formula module's policy type.
/// An unknown adjustment type in the table is a config error, surfaced
/// as 422 rather than a panic.
pub fn goal_policy(config: &GoalConfig) -> Result<GoalPolicy, ApiError> {
    let adjustment = Adjustment::from_config(&config.adjustment_type, config.adjustment_value)
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!(
                "Unknown goal adjustment type '{}'",
                config.adjustment_type
            ))
        })?;
    Ok(GoalPolicy {
        adjustment,
        carbs_pct: config.carbs_pct,
        protein_pct: config.protein_pct,
        fat_pct: config.fat_pct,
    })
}

pub fn compute_targets(
    gender: Gender,
    birth_date: Date,
    height_cm: Decimal,
    weight_kg: Decimal,
    activity_multiplier: Decimal,
    adjustment: Adjustment,
    today: Date,
) -> DerivedTargets {
    let age = formula::age_years(birth_date, today);
    let bmr = formula::bmr(gender, weight_kg, height_cm, age);
    let tdee = formula::tdee(bmr, activity_multiplier);
    DerivedTargets {
        bmr,
        tdee,
        daily_calorie_target: formula::daily_calorie_target(tdee, adjustment),
        daily_water_target_ml: formula::daily_water_target_ml(weight_kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    #[test]
    fn targets_chain_through_the_formulas() {
        let derived = compute_targets(
            Gender::Male,
            date!(1990 - 08 - 06),
            dec!(180),
            dec!(80),
            dec!(1.55),
            Adjustment::Percentage(dec!(-15)),
            date!(2025 - 08 - 06),
        );
        assert_eq!(derived.bmr, dec!(1755.00));
        assert_eq!(derived.tdee, dec!(2720.25));
        assert_eq!(derived.daily_calorie_target, dec!(2312.21));
        assert_eq!(derived.daily_water_target_ml, dec!(2800.00));
    }

    #[test]
    fn goal_policy_rejects_unknown_adjustment() {
        let config = GoalConfig {
            code: "LOSE_WEIGHT".into(),
            adjustment_type: "HALVE".into(),
            adjustment_value: dec!(0),
            carbs_pct: dec!(45),
            protein_pct: dec!(30),
            fat_pct: dec!(25),
        };
        assert!(goal_policy(&config).is_err());
    }
}
