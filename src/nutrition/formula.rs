//! Profile-derived energy math: Mifflin-St Jeor BMR, activity-scaled TDEE,
//! goal-adjusted daily calorie target, macro split, BMI.
//!
//! Activity multipliers and goal adjustments are data (`activity_levels` /
//! `goal_configs` tables), not hardcoded branches; this module only does
//! the arithmetic on whatever policy the caller looked up. The current
//! date is always passed in, never read from the system clock.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use super::macros::{round2, TargetMacros};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

/// Calorie adjustment applied to TDEE, loaded from `goal_configs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Signed percent of TDEE, e.g. -15 for a 15% deficit.
    Percentage(Decimal),
    /// Signed kcal offset, e.g. +300 for a fixed surplus.
    Fixed(Decimal),
    /// Maintenance: target equals TDEE.
    None,
}

impl Adjustment {
    pub fn from_config(kind: &str, value: Decimal) -> Option<Adjustment> {
        match kind {
            "PERCENTAGE" => Some(Adjustment::Percentage(value)),
            "FIXED" => Some(Adjustment::Fixed(value)),
            "NONE" => Some(Adjustment::None),
            _ => None,
        }
    }
}

/// Full goal policy: calorie adjustment plus the macro split used to
/// derive gram targets from the calorie target.
#[derive(Debug, Clone)]
pub struct GoalPolicy {
    pub adjustment: Adjustment,
    pub carbs_pct: Decimal,
    pub protein_pct: Decimal,
    pub fat_pct: Decimal,
}

/// Whole years between `birth` and `today`.
pub fn age_years(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (u8::from(today.month()), today.day()) < (u8::from(birth.month()), birth.day()) {
        age -= 1;
    }
    age
}

/// Mifflin-St Jeor resting energy expenditure. For `Gender::Other` the
/// male and female formulas are averaged.
pub fn bmr(gender: Gender, weight_kg: Decimal, height_cm: Decimal, age_years: i32) -> Decimal {
    let base = Decimal::from(10) * weight_kg + Decimal::new(625, 2) * height_cm
        - Decimal::from(5) * Decimal::from(age_years);
    let value = match gender {
        Gender::Male => base + Decimal::from(5),
        Gender::Female => base - Decimal::from(161),
        Gender::Other => base + (Decimal::from(5) - Decimal::from(161)) / Decimal::from(2),
    };
    round2(value)
}

pub fn tdee(bmr: Decimal, activity_multiplier: Decimal) -> Decimal {
    round2(bmr * activity_multiplier)
}

pub fn daily_calorie_target(tdee: Decimal, adjustment: Adjustment) -> Decimal {
    let value = match adjustment {
        Adjustment::Percentage(pct) => tdee * (Decimal::ONE_HUNDRED + pct) / Decimal::ONE_HUNDRED,
        Adjustment::Fixed(kcal) => tdee + kcal,
        Adjustment::None => tdee,
    };
    round2(value)
}

/// Gram targets from a calorie target and the goal's macro split
/// (4 kcal/g for carbs and protein, 9 kcal/g for fat).
pub fn macro_targets(calorie_target: Decimal, policy: &GoalPolicy) -> TargetMacros {
    let share = |pct: Decimal, kcal_per_g: Decimal| {
        round2(calorie_target * pct / Decimal::ONE_HUNDRED / kcal_per_g)
    };
    TargetMacros {
        calories: round2(calorie_target),
        carbs_g: share(policy.carbs_pct, Decimal::from(4)),
        protein_g: share(policy.protein_pct, Decimal::from(4)),
        fat_g: share(policy.fat_pct, Decimal::from(9)),
    }
}

/// Default daily water target: 35 ml per kg of body weight.
pub fn daily_water_target_ml(weight_kg: Decimal) -> Decimal {
    round2(weight_kg * Decimal::from(35))
}

pub fn bmi(weight_kg: Decimal, height_cm: Decimal) -> Decimal {
    let height_m = height_cm / Decimal::ONE_HUNDRED;
    round2(weight_kg / (height_m * height_m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

pub fn bmi_category(bmi: Decimal) -> BmiCategory {
    if bmi < Decimal::new(185, 1) {
        BmiCategory::Underweight
    } else if bmi < Decimal::from(25) {
        BmiCategory::NormalWeight
    } else if bmi < Decimal::from(30) {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    #[test]
    fn age_counts_whole_years_only() {
        let birth = date!(1990 - 06 - 15);
        assert_eq!(age_years(birth, date!(2025 - 06 - 14)), 34);
        assert_eq!(age_years(birth, date!(2025 - 06 - 15)), 35);
        assert_eq!(age_years(birth, date!(2025 - 12 - 01)), 35);
    }

    #[test]
    fn mifflin_st_jeor_reference_values() {
        // 80kg, 180cm, 35y male: 800 + 1125 - 175 + 5 = 1755
        assert_eq!(bmr(Gender::Male, dec!(80), dec!(180), 35), dec!(1755.00));
        assert_eq!(bmr(Gender::Female, dec!(80), dec!(180), 35), dec!(1589.00));
        // Other averages the two
        assert_eq!(bmr(Gender::Other, dec!(80), dec!(180), 35), dec!(1672.00));
    }

    #[test]
    fn tdee_scales_by_activity_multiplier() {
        assert_eq!(tdee(dec!(1755.00), dec!(1.55)), dec!(2720.25));
    }

    #[test]
    fn calorie_target_honours_each_adjustment_kind() {
        let t = dec!(2720.25);
        assert_eq!(
            daily_calorie_target(t, Adjustment::Percentage(dec!(-15))),
            dec!(2312.21) // 2720.25 * 0.85 = 2312.2125
        );
        assert_eq!(daily_calorie_target(t, Adjustment::Fixed(dec!(300))), dec!(3020.25));
        assert_eq!(daily_calorie_target(t, Adjustment::None), t);
    }

    #[test]
    fn macro_split_uses_atwater_factors() {
        let policy = GoalPolicy {
            adjustment: Adjustment::None,
            carbs_pct: dec!(50),
            protein_pct: dec!(20),
            fat_pct: dec!(30),
        };
        let targets = macro_targets(dec!(2000), &policy);
        assert_eq!(targets.calories, dec!(2000));
        assert_eq!(targets.carbs_g, dec!(250.00));
        assert_eq!(targets.protein_g, dec!(100.00));
        assert_eq!(targets.fat_g, dec!(66.67));
    }

    #[test]
    fn bmi_rounds_half_up_and_classifies() {
        let b = bmi(dec!(80), dec!(180));
        assert_eq!(b, dec!(24.69));
        assert_eq!(bmi_category(b), BmiCategory::NormalWeight);
        assert_eq!(bmi_category(dec!(18.49)), BmiCategory::Underweight);
        assert_eq!(bmi_category(dec!(18.5)), BmiCategory::NormalWeight);
        assert_eq!(bmi_category(dec!(25)), BmiCategory::Overweight);
        assert_eq!(bmi_category(dec!(30)), BmiCategory::Obese);
    }

    #[test]
    fn water_target_is_35ml_per_kg() {
        assert_eq!(daily_water_target_ml(dec!(80)), dec!(2800.00));
    }

    #[test]
    fn adjustment_rejects_unknown_kind() {
        assert!(Adjustment::from_config("DOUBLE", dec!(1)).is_none());
        assert_eq!(
            Adjustment::from_config("NONE", dec!(0)),
            Some(Adjustment::None)
        );
    }
}
