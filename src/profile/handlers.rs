use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    dates::parse_date,
    error::{is_unique_violation, ApiError},
    nutrition::formula::Gender,
    state::AppState,
};

use super::{
    dto::{ProfileRequest, ProfileResponse, UpdateWeightRequest},
    repo::{ActivityLevel, GoalConfig, Profile, ProfileInput},
    service::{compute_targets, goal_policy},
};

/// Validate the request and resolve its enum codes against the config
/// tables, producing a fully-derived row ready to insert.
async fn resolve_input(
    state: &AppState,
    payload: &ProfileRequest,
) -> Result<ProfileInput, ApiError> {
    if payload.height_cm <= Decimal::ZERO {
        return Err(ApiError::Validation("height_cm must be positive".into()));
    }
    if payload.weight_kg <= Decimal::ZERO {
        return Err(ApiError::Validation("weight_kg must be positive".into()));
    }

    let birth_date = parse_date(&payload.birth_date)?;
    let target_date = payload.target_date.as_deref().map(parse_date).transpose()?;

    let gender = Gender::parse(&payload.gender).ok_or_else(|| {
        ApiError::UnprocessableEntity(format!("Unknown gender '{}'", payload.gender))
    })?;
    let activity = ActivityLevel::find(&state.db, &payload.activity_level)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!(
                "Unknown activity level '{}'",
                payload.activity_level
            ))
        })?;
    let goal = GoalConfig::find(&state.db, &payload.goal)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!("Unknown goal '{}'", payload.goal))
        })?;
    let policy = goal_policy(&goal)?;

    let today = OffsetDateTime::now_utc().date();
    let derived = compute_targets(
        gender,
        birth_date,
        payload.height_cm,
        payload.weight_kg,
        activity.multiplier,
        policy.adjustment,
        today,
    );

    Ok(ProfileInput {
        birth_date,
        gender: gender.as_str().to_string(),
        height_cm: payload.height_cm,
        weight_kg: payload.weight_kg,
        target_weight_kg: payload.target_weight_kg,
        target_date,
        activity_level: activity.code,
        goal: goal.code,
        bmr: derived.bmr,
        tdee: derived.tdee,
        daily_calorie_target: derived.daily_calorie_target,
        daily_water_target_ml: derived.daily_water_target_ml,
    })
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let input = resolve_input(&state, &payload).await?;

    let profile = match Profile::create(&state.db, user_id, &input).await {
        Ok(p) => p,
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = %user_id, "duplicate profile");
            return Err(ApiError::UnprocessableEntity("Profile already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user_id, "profile created");
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let input = resolve_input(&state, &payload).await?;

    let profile = Profile::update(&state.db, user_id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(profile.into()))
}

/// Weight-only update; targets are recomputed from the stored profile
/// with the new weight.
#[instrument(skip(state, payload))]
pub async fn update_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateWeightRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if payload.weight_kg <= Decimal::ZERO {
        return Err(ApiError::Validation("weight_kg must be positive".into()));
    }

    let current = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;

    let gender = Gender::parse(&current.gender).ok_or_else(|| {
        ApiError::UnprocessableEntity(format!("Unknown gender '{}'", current.gender))
    })?;
    let activity = ActivityLevel::find(&state.db, &current.activity_level)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!(
                "Unknown activity level '{}'",
                current.activity_level
            ))
        })?;
    let goal = GoalConfig::find(&state.db, &current.goal)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!("Unknown goal '{}'", current.goal))
        })?;
    let policy = goal_policy(&goal)?;

    let today = OffsetDateTime::now_utc().date();
    let derived = compute_targets(
        gender,
        current.birth_date,
        current.height_cm,
        payload.weight_kg,
        activity.multiplier,
        policy.adjustment,
        today,
    );

    let profile = Profile::update_weight(
        &state.db,
        user_id,
        payload.weight_kg,
        derived.bmr,
        derived.tdee,
        derived.daily_calorie_target,
        derived.daily_water_target_ml,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Profile"))?;

    info!(user_id = %user_id, weight_kg = %payload.weight_kg, "weight updated");
    Ok(Json(profile.into()))
}
