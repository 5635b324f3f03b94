use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Food;

#[derive(Debug, Deserialize)]
pub struct FoodRequest {
    pub name: String,
    pub category: Option<String>,
    pub calories: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub protein_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub fiber_g: Option<Decimal>,
    pub sugar_g: Option<Decimal>,
    pub sodium_mg: Option<Decimal>,
    pub saturated_fat_g: Option<Decimal>,
    pub serving_size_g: Option<Decimal>,
    pub serving_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub calories: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub protein_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub fiber_g: Option<Decimal>,
    pub sugar_g: Option<Decimal>,
    pub sodium_mg: Option<Decimal>,
    pub saturated_fat_g: Option<Decimal>,
    pub serving_size_g: Option<Decimal>,
    pub serving_description: Option<String>,
    pub shared: bool,
}

impl From<Food> for FoodResponse {
    fn from(f: Food) -> Self {
        Self {
            id: f.id,
            name: f.name,
            category: f.category,
            calories: f.calories,
            carbs_g: f.carbs_g,
            protein_g: f.protein_g,
            fat_g: f.fat_g,
            fiber_g: f.fiber_g,
            sugar_g: f.sugar_g,
            sodium_mg: f.sodium_mg,
            saturated_fat_g: f.saturated_fat_g,
            serving_size_g: f.serving_size_g,
            serving_description: f.serving_description,
            shared: f.owner_id.is_none(),
        }
    }
}
