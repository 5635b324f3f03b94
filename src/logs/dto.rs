use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::format_date;
use crate::nutrition::summary::CalorieStatus;

use super::repo::CalorieEntry;

/// One of three shapes: manual (calories required), food-linked
/// (food_id + quantity + unit), or meal-linked (meal_id).
#[derive(Debug, Deserialize)]
pub struct CreateCalorieEntryRequest {
    pub date: String,
    pub description: Option<String>,
    pub calories: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub protein_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub food_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub meal_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CalorieSummaryQuery {
    pub date: String,
    /// Band around the target within which the day counts as on target.
    #[serde(default)]
    pub tolerance: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySource {
    Manual,
    Food,
    Meal,
}

#[derive(Debug, Serialize)]
pub struct CalorieEntryResponse {
    pub id: Uuid,
    pub date: String,
    pub description: Option<String>,
    pub source: EntrySource,
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
}

impl From<CalorieEntry> for CalorieEntryResponse {
    fn from(e: CalorieEntry) -> Self {
        let source = if e.food_id.is_some() {
            EntrySource::Food
        } else if e.meal_id.is_some() {
            EntrySource::Meal
        } else {
            EntrySource::Manual
        };
        Self {
            id: e.id,
            date: format_date(e.entry_date),
            description: e.description,
            source,
            calories: e.calories,
            carbs_g: e.carbs_g,
            protein_g: e.protein_g,
            fat_g: e.fat_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalorieSummaryResponse {
    pub date: String,
    pub entries: i64,
    pub calories: Decimal,
    pub carbs_g: Decimal,
    pub protein_g: Decimal,
    pub fat_g: Decimal,
    /// Absent when no profile target is available ("not calculated").
    pub target_calories: Option<Decimal>,
    pub remaining_calories: Option<Decimal>,
    pub progress_pct: Option<Decimal>,
    pub status: Option<CalorieStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWaterRequest {
    pub date: String,
    pub amount_ml: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WaterIntakeResponse {
    pub id: Uuid,
    pub date: String,
    pub amount_ml: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WaterSummaryResponse {
    pub date: String,
    pub entries: i64,
    pub consumed_ml: Decimal,
    pub target_ml: Option<Decimal>,
    pub remaining_ml: Option<Decimal>,
    pub progress_pct: Option<Decimal>,
}
