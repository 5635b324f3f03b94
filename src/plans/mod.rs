mod dto;
mod handlers;
pub mod repo;
pub mod service;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", post(handlers::create_plan))
        .route("/plans/:date", get(handlers::get_plan))
        .route("/plans/:date/summary", get(handlers::get_summary))
        .route("/plans/:date/meals", post(handlers::add_meal))
        .route("/plans/:date/extras", post(handlers::add_extra_food))
        .route("/meals/:id", delete(handlers::delete_meal))
        .route("/meals/:id/check-in", put(handlers::check_in_meal))
        .route("/meals/:id/foods", post(handlers::add_meal_food))
        .route("/meal-foods/:id/consumption", put(handlers::set_consumption))
        .route("/meal-foods/:id", delete(handlers::delete_meal_food))
        .route("/extra-foods/:id", delete(handlers::delete_extra_food))
}
