use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{
    dto::{FoodQuery, FoodRequest, FoodResponse},
    repo::{Food, FoodInput},
};

fn validate(payload: &FoodRequest) -> Result<FoodInput, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let non_negative = [
        ("calories", payload.calories),
        ("carbs_g", payload.carbs_g),
        ("protein_g", payload.protein_g),
        ("fat_g", payload.fat_g),
        ("fiber_g", payload.fiber_g),
        ("sugar_g", payload.sugar_g),
        ("sodium_mg", payload.sodium_mg),
        ("saturated_fat_g", payload.saturated_fat_g),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if v < Decimal::ZERO {
                return Err(ApiError::Validation(format!("{} must not be negative", field)));
            }
        }
    }
    if let Some(serving) = payload.serving_size_g {
        if serving <= Decimal::ZERO {
            return Err(ApiError::Validation("serving_size_g must be positive".into()));
        }
    }
    Ok(FoodInput {
        name,
        category: payload.category.clone(),
        calories: payload.calories,
        carbs_g: payload.carbs_g,
        protein_g: payload.protein_g,
        fat_g: payload.fat_g,
        fiber_g: payload.fiber_g,
        sugar_g: payload.sugar_g,
        sodium_mg: payload.sodium_mg,
        saturated_fat_g: payload.saturated_fat_g,
        serving_size_g: payload.serving_size_g,
        serving_description: payload.serving_description.clone(),
    })
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<FoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), ApiError> {
    let input = validate(&payload)?;
    let food = Food::create(&state.db, user_id, &input).await?;
    info!(user_id = %user_id, food_id = %food.id, "food created");
    Ok((StatusCode::CREATED, Json(food.into())))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<FoodQuery>,
) -> Result<Json<Vec<FoodResponse>>, ApiError> {
    let foods = Food::list(
        &state.db,
        user_id,
        p.q.as_deref(),
        p.category.as_deref(),
        p.limit,
        p.offset,
    )
    .await?;
    Ok(Json(foods.into_iter().map(FoodResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodResponse>, ApiError> {
    let food = Food::find_visible(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Food"))?;
    Ok(Json(food.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodRequest>,
) -> Result<Json<FoodResponse>, ApiError> {
    let input = validate(&payload)?;
    let food = Food::update(&state.db, user_id, id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("Food"))?;
    info!(user_id = %user_id, food_id = %id, "food updated");
    Ok(Json(food.into()))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Food::delete(&state.db, user_id, id).await? {
        return Err(ApiError::not_found("Food"));
    }
    info!(user_id = %user_id, food_id = %id, "food deleted");
    Ok(StatusCode::NO_CONTENT)
}
