use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    dates::parse_date,
    error::ApiError,
    foods::repo::Food,
    nutrition::quantity::{scale_basis, Unit},
    nutrition::summary::{classify_calories, progress_pct},
    plans::repo::{Meal, MealFood},
    plans::service::meal_target,
    profile::repo::Profile,
    state::AppState,
};

use super::{
    dto::{
        CalorieEntryResponse, CalorieSummaryQuery, CalorieSummaryResponse,
        CreateCalorieEntryRequest, CreateWaterRequest, DayQuery, WaterIntakeResponse,
        WaterSummaryResponse,
    },
    repo::{CalorieEntry, CalorieEntryInput, WaterIntake},
};

/// Resolve the entry's macro figures from whichever source the body
/// names: a food (scaled by quantity), a meal (its snapshot totals), or
/// explicit manual values.
async fn resolve_entry(
    state: &AppState,
    user_id: Uuid,
    payload: &CreateCalorieEntryRequest,
) -> Result<CalorieEntryInput, ApiError> {
    let entry_date = parse_date(&payload.date)?;

    if payload.food_id.is_some() && payload.meal_id.is_some() {
        return Err(ApiError::Validation(
            "food_id and meal_id are mutually exclusive".into(),
        ));
    }

    if let Some(food_id) = payload.food_id {
        let quantity = payload
            .quantity
            .ok_or_else(|| ApiError::Validation("quantity is required for a food entry".into()))?;
        if quantity <= Decimal::ZERO {
            return Err(ApiError::Validation("quantity must be positive".into()));
        }
        let unit_str = payload
            .unit
            .as_deref()
            .ok_or_else(|| ApiError::Validation("unit is required for a food entry".into()))?;
        let unit = Unit::parse(unit_str)
            .ok_or_else(|| ApiError::Validation(format!("Unknown unit '{}'", unit_str)))?;
        let food = Food::find_visible(&state.db, user_id, food_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Food"))?;
        let macros = scale_basis(&food.basis(), quantity, unit, food.serving_size_g);
        return Ok(CalorieEntryInput {
            entry_date,
            description: payload.description.clone().or(Some(food.name)),
            food_id: Some(food.id),
            meal_id: None,
            calories: macros.calories,
            carbs_g: macros.carbs_g,
            protein_g: macros.protein_g,
            fat_g: macros.fat_g,
        });
    }

    if let Some(meal_id) = payload.meal_id {
        let meal = Meal::find_owned(&state.db, user_id, meal_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Meal"))?;
        let foods = MealFood::list_for_meal(&state.db, meal.id).await?;
        let macros = meal_target(&foods);
        return Ok(CalorieEntryInput {
            entry_date,
            description: payload.description.clone().or(Some(meal.name)),
            food_id: None,
            meal_id: Some(meal.id),
            calories: macros.calories,
            carbs_g: macros.carbs_g,
            protein_g: macros.protein_g,
            fat_g: macros.fat_g,
        });
    }

    let calories = payload
        .calories
        .ok_or_else(|| ApiError::Validation("calories is required for a manual entry".into()))?;
    let fields = [
        ("calories", Some(calories)),
        ("carbs_g", payload.carbs_g),
        ("protein_g", payload.protein_g),
        ("fat_g", payload.fat_g),
    ];
    for (field, value) in fields {
        if let Some(v) = value {
            if v < Decimal::ZERO {
                return Err(ApiError::Validation(format!("{} must not be negative", field)));
            }
        }
    }
    Ok(CalorieEntryInput {
        entry_date,
        description: payload.description.clone(),
        food_id: None,
        meal_id: None,
        calories,
        carbs_g: payload.carbs_g.unwrap_or_default(),
        protein_g: payload.protein_g.unwrap_or_default(),
        fat_g: payload.fat_g.unwrap_or_default(),
    })
}

#[instrument(skip(state, payload))]
pub async fn create_calorie_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCalorieEntryRequest>,
) -> Result<(StatusCode, Json<CalorieEntryResponse>), ApiError> {
    let input = resolve_entry(&state, user_id, &payload).await?;
    let entry = CalorieEntry::insert(&state.db, user_id, &input).await?;
    info!(user_id = %user_id, entry_id = %entry.id, calories = %entry.calories, "calorie entry logged");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state))]
pub async fn list_calorie_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<DayQuery>,
) -> Result<Json<Vec<CalorieEntryResponse>>, ApiError> {
    let day = parse_date(&p.date)?;
    let entries = CalorieEntry::list_for_day(&state.db, user_id, day).await?;
    Ok(Json(entries.into_iter().map(CalorieEntryResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn calorie_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<CalorieSummaryQuery>,
) -> Result<Json<CalorieSummaryResponse>, ApiError> {
    if p.tolerance < Decimal::ZERO {
        return Err(ApiError::Validation("tolerance must not be negative".into()));
    }
    let day = parse_date(&p.date)?;
    let entries = CalorieEntry::list_for_day(&state.db, user_id, day).await?;

    let mut calories = Decimal::ZERO;
    let mut carbs_g = Decimal::ZERO;
    let mut protein_g = Decimal::ZERO;
    let mut fat_g = Decimal::ZERO;
    for e in &entries {
        calories += e.calories;
        carbs_g += e.carbs_g;
        protein_g += e.protein_g;
        fat_g += e.fat_g;
    }

    let target_calories = Profile::find_by_user(&state.db, user_id)
        .await?
        .and_then(|profile| profile.daily_calorie_target);

    Ok(Json(CalorieSummaryResponse {
        date: p.date,
        entries: entries.len() as i64,
        calories,
        carbs_g,
        protein_g,
        fat_g,
        target_calories,
        remaining_calories: target_calories.map(|t| t - calories),
        progress_pct: target_calories.map(|t| progress_pct(calories, t)),
        status: target_calories.map(|t| classify_calories(calories, t, p.tolerance)),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_water_intake(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateWaterRequest>,
) -> Result<(StatusCode, Json<WaterIntakeResponse>), ApiError> {
    if payload.amount_ml <= Decimal::ZERO {
        return Err(ApiError::Validation("amount_ml must be positive".into()));
    }
    let day = parse_date(&payload.date)?;
    let row = WaterIntake::insert(&state.db, user_id, day, payload.amount_ml).await?;
    info!(user_id = %user_id, amount_ml = %row.amount_ml, "water intake logged");
    Ok((
        StatusCode::CREATED,
        Json(WaterIntakeResponse {
            id: row.id,
            date: payload.date,
            amount_ml: row.amount_ml,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn water_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<DayQuery>,
) -> Result<Json<WaterSummaryResponse>, ApiError> {
    let day = parse_date(&p.date)?;
    let (entries, consumed_ml) = WaterIntake::day_totals(&state.db, user_id, day).await?;

    let target_ml = Profile::find_by_user(&state.db, user_id)
        .await?
        .and_then(|profile| profile.daily_water_target_ml);

    Ok(Json(WaterSummaryResponse {
        date: p.date,
        entries,
        consumed_ml,
        target_ml,
        remaining_ml: target_ml.map(|t| t - consumed_ml),
        progress_pct: target_ml.map(|t| progress_pct(consumed_ml, t)),
    }))
}
