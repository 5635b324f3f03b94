use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::format_date;
use crate::nutrition::formula::{bmi, bmi_category, BmiCategory};

use super::repo::Profile;

/// Full profile body, used for both create and replace.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub birth_date: String,
    pub gender: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub target_weight_kg: Option<Decimal>,
    pub target_date: Option<String>,
    pub activity_level: String,
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWeightRequest {
    pub weight_kg: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub birth_date: String,
    pub gender: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub target_weight_kg: Option<Decimal>,
    pub target_date: Option<String>,
    pub activity_level: String,
    pub goal: String,
    pub bmr: Option<Decimal>,
    pub tdee: Option<Decimal>,
    pub daily_calorie_target: Option<Decimal>,
    pub daily_water_target_ml: Option<Decimal>,
    pub bmi: Decimal,
    pub bmi_category: BmiCategory,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        let bmi_value = bmi(p.weight_kg, p.height_cm);
        Self {
            birth_date: format_date(p.birth_date),
            gender: p.gender,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            target_weight_kg: p.target_weight_kg,
            target_date: p.target_date.map(format_date),
            activity_level: p.activity_level,
            goal: p.goal,
            bmr: p.bmr,
            tdee: p.tdee,
            daily_calorie_target: p.daily_calorie_target,
            daily_water_target_ml: p.daily_water_target_ml,
            bmi: bmi_value,
            bmi_category: bmi_category(bmi_value),
        }
    }
}
