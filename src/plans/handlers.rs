use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    dates::parse_date,
    error::{is_unique_violation, ApiError},
    foods::repo::Food,
    nutrition::formula::macro_targets,
    nutrition::macros::TargetMacros,
    nutrition::quantity::{scale_basis, Unit},
    nutrition::summary::{build_daily_summary, PlanView},
    profile::repo::{GoalConfig, Profile},
    profile::service::goal_policy,
    state::AppState,
};

use super::{
    dto::{
        AddFoodRequest, CheckInRequest, ConsumptionRequest, CreateMealRequest,
        CreatePlanRequest, ExtraFoodResponse, MealFoodResponse, MealResponse, PlanResponse,
        SummaryResponse,
    },
    repo::{CheckInInput, ExtraFood, Meal, MealCheckIn, MealFood, MealPlan},
    service::{load_contents, to_plan_view, MealWithItems, PlanContents},
};

/// Target macros for a new plan, copied from the profile at generation
/// time. Without a profile the plan is created with empty targets.
async fn plan_targets(
    state: &AppState,
    user_id: Uuid,
) -> Result<Option<TargetMacros>, ApiError> {
    let Some(profile) = Profile::find_by_user(&state.db, user_id).await? else {
        return Ok(None);
    };
    let Some(calorie_target) = profile.daily_calorie_target else {
        return Ok(None);
    };
    let goal = GoalConfig::find(&state.db, &profile.goal)
        .await?
        .ok_or_else(|| {
            ApiError::UnprocessableEntity(format!("Unknown goal '{}'", profile.goal))
        })?;
    let policy = goal_policy(&goal)?;
    Ok(Some(macro_targets(calorie_target, &policy)))
}

#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let date = parse_date(&payload.date)?;
    let targets = plan_targets(&state, user_id).await?;

    let plan = match MealPlan::create(&state.db, user_id, date, targets.as_ref()).await {
        Ok(p) => p,
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = %user_id, date = %payload.date, "duplicate plan");
            return Err(ApiError::UnprocessableEntity(
                "A plan already exists for this date".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user_id, plan_id = %plan.id, date = %payload.date, "plan created");
    let empty = PlanContents {
        meals: Vec::new(),
        extras: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(PlanResponse::build(plan, empty))))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let date = parse_date(&date)?;
    let plan = MealPlan::find_by_date(&state.db, user_id, date)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan"))?;
    let contents = load_contents(&state.db, plan.id).await?;
    Ok(Json(PlanResponse::build(plan, contents)))
}

/// Daily summary. A date without a plan is not an error: it yields an
/// all-zero summary with empty targets.
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let day = parse_date(&date)?;
    let view = match MealPlan::find_by_date(&state.db, user_id, day).await? {
        Some(plan) => {
            let contents = load_contents(&state.db, plan.id).await?;
            to_plan_view(&plan, &contents)
        }
        None => PlanView::default(),
    };
    Ok(Json(SummaryResponse {
        date,
        summary: build_daily_summary(&view),
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let date = parse_date(&date)?;
    let plan = MealPlan::find_by_date(&state.db, user_id, date)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan"))?;

    let meal = Meal::create(&state.db, plan.id, &name, payload.position).await?;
    info!(user_id = %user_id, meal_id = %meal.id, "meal added");
    Ok((
        StatusCode::CREATED,
        Json(MealResponse::from(MealWithItems {
            meal,
            foods: Vec::new(),
            check_in: None,
        })),
    ))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Meal::delete(&state.db, user_id, id).await? {
        return Err(ApiError::not_found("Meal"));
    }
    info!(user_id = %user_id, meal_id = %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn add_meal_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddFoodRequest>,
) -> Result<(StatusCode, Json<MealFoodResponse>), ApiError> {
    if payload.quantity <= Decimal::ZERO {
        return Err(ApiError::Validation("quantity must be positive".into()));
    }
    let unit = Unit::parse(&payload.unit)
        .ok_or_else(|| ApiError::Validation(format!("Unknown unit '{}'", payload.unit)))?;

    let meal = Meal::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal"))?;
    let food = Food::find_visible(&state.db, user_id, payload.food_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Food"))?;

    // Snapshot at creation time; later food edits don't touch this row
    let snapshot = scale_basis(&food.basis(), payload.quantity, unit, food.serving_size_g);
    let row = MealFood::insert(
        &state.db,
        meal.id,
        food.id,
        &food.name,
        payload.quantity,
        unit.as_str(),
        &snapshot,
    )
    .await?;

    info!(user_id = %user_id, meal_id = %meal.id, food_id = %food.id, "meal food added");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state, payload))]
pub async fn set_consumption(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConsumptionRequest>,
) -> Result<Json<MealFoodResponse>, ApiError> {
    if let Some(qty) = payload.consumed_quantity {
        if qty < Decimal::ZERO {
            return Err(ApiError::Validation(
                "consumed_quantity must not be negative".into(),
            ));
        }
    }
    let row = MealFood::set_consumption(
        &state.db,
        user_id,
        id,
        payload.consumed,
        payload.consumed_quantity,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Meal food"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !MealFood::delete(&state.db, user_id, id).await? {
        return Err(ApiError::not_found("Meal food"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Check a meal in. The first call creates the check-in, later calls
/// update it in place; a meal never has two.
#[instrument(skip(state, payload))]
pub async fn check_in_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    if payload.completion_pct < Decimal::ZERO || payload.completion_pct > Decimal::ONE_HUNDRED {
        return Err(ApiError::Validation(
            "completion_pct must be between 0 and 100".into(),
        ));
    }
    if let Some(s) = payload.satisfaction {
        if !(1..=5).contains(&s) {
            return Err(ApiError::Validation(
                "satisfaction must be between 1 and 5".into(),
            ));
        }
    }

    let meal = Meal::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal"))?;

    let check_in = MealCheckIn::upsert(
        &state.db,
        meal.id,
        &CheckInInput {
            completion_pct: payload.completion_pct,
            actual_calories: payload.actual_calories,
            actual_carbs_g: payload.actual_carbs_g,
            actual_protein_g: payload.actual_protein_g,
            actual_fat_g: payload.actual_fat_g,
            satisfaction: payload.satisfaction,
        },
    )
    .await?;

    info!(
        user_id = %user_id,
        meal_id = %meal.id,
        completion_pct = %check_in.completion_pct,
        "meal checked in"
    );

    let foods = MealFood::list_for_meal(&state.db, meal.id).await?;
    Ok(Json(MealResponse::from(MealWithItems {
        meal,
        foods,
        check_in: Some(check_in),
    })))
}

#[instrument(skip(state, payload))]
pub async fn add_extra_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<AddFoodRequest>,
) -> Result<(StatusCode, Json<ExtraFoodResponse>), ApiError> {
    if payload.quantity <= Decimal::ZERO {
        return Err(ApiError::Validation("quantity must be positive".into()));
    }
    let unit = Unit::parse(&payload.unit)
        .ok_or_else(|| ApiError::Validation(format!("Unknown unit '{}'", payload.unit)))?;

    let date = parse_date(&date)?;
    let plan = MealPlan::find_by_date(&state.db, user_id, date)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal plan"))?;
    let food = Food::find_visible(&state.db, user_id, payload.food_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Food"))?;

    let snapshot = scale_basis(&food.basis(), payload.quantity, unit, food.serving_size_g);
    let row = ExtraFood::insert(
        &state.db,
        plan.id,
        food.id,
        &food.name,
        payload.quantity,
        unit.as_str(),
        &snapshot,
    )
    .await?;

    info!(user_id = %user_id, plan_id = %plan.id, food_id = %food.id, "extra food added");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state))]
pub async fn delete_extra_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !ExtraFood::delete(&state.db, user_id, id).await? {
        return Err(ApiError::not_found("Extra food"));
    }
    Ok(StatusCode::NO_CONTENT)
}
