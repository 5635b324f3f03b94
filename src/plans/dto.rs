use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::format_date;
use crate::nutrition::macros::{MacroSet, TargetMacros};
use crate::nutrition::reconcile::{effective_macros, line_item_actual, meal_state, MealState};
use crate::nutrition::summary::DailySummary;

use super::repo::{ExtraFood, MealCheckIn, MealFood, MealPlan};
use super::service::{meal_target, MealWithItems, PlanContents};

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub food_id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsumptionRequest {
    pub consumed: bool,
    pub consumed_quantity: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub completion_pct: Decimal,
    pub actual_calories: Option<Decimal>,
    pub actual_carbs_g: Option<Decimal>,
    pub actual_protein_g: Option<Decimal>,
    pub actual_fat_g: Option<Decimal>,
    pub satisfaction: Option<i16>,
}

#[derive(Debug, Serialize)]
pub struct MealFoodResponse {
    pub id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub calculated: MacroSet,
    pub consumed: bool,
    pub consumed_quantity: Option<Decimal>,
    /// Line-item consumption model: snapshot scaled by consumed/planned.
    pub actual: MacroSet,
}

impl From<MealFood> for MealFoodResponse {
    fn from(f: MealFood) -> Self {
        let calculated = f.snapshot();
        let actual = line_item_actual(&calculated, f.quantity, f.consumed, f.consumed_quantity);
        Self {
            id: f.id,
            food_id: f.food_id,
            food_name: f.food_name,
            quantity: f.quantity,
            unit: f.unit,
            calculated,
            consumed: f.consumed,
            consumed_quantity: f.consumed_quantity,
            actual,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub position: i32,
    pub foods: Vec<MealFoodResponse>,
    pub target: MacroSet,
    pub consumed: MacroSet,
    pub completion_pct: Option<Decimal>,
    pub state: MealState,
    pub satisfaction: Option<i16>,
}

impl From<MealWithItems> for MealResponse {
    fn from(m: MealWithItems) -> Self {
        let target = meal_target(&m.foods);
        let check_in = m.check_in.as_ref().map(MealCheckIn::to_check_in);
        Self {
            id: m.meal.id,
            name: m.meal.name,
            position: m.meal.position,
            consumed: effective_macros(&target, check_in.as_ref()),
            completion_pct: check_in.as_ref().map(|c| c.completion_pct),
            state: meal_state(check_in.as_ref()),
            satisfaction: check_in.as_ref().and_then(|c| c.satisfaction),
            target,
            foods: m.foods.into_iter().map(MealFoodResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtraFoodResponse {
    pub id: Uuid,
    pub food_id: Option<Uuid>,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub calculated: MacroSet,
}

impl From<ExtraFood> for ExtraFoodResponse {
    fn from(e: ExtraFood) -> Self {
        let calculated = e.snapshot();
        Self {
            id: e.id,
            food_id: e.food_id,
            food_name: e.food_name,
            quantity: e.quantity,
            unit: e.unit,
            calculated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub date: String,
    pub targets: Option<TargetMacros>,
    pub meals: Vec<MealResponse>,
    pub extras: Vec<ExtraFoodResponse>,
}

impl PlanResponse {
    pub fn build(plan: MealPlan, contents: PlanContents) -> Self {
        Self {
            id: plan.id,
            date: format_date(plan.plan_date),
            targets: plan.targets(),
            meals: contents.meals.into_iter().map(MealResponse::from).collect(),
            extras: contents
                .extras
                .into_iter()
                .map(ExtraFoodResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    #[serde(flatten)]
    pub summary: DailySummary,
}
