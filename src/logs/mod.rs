mod dto;
mod handlers;
pub mod repo;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/calories",
            get(handlers::list_calorie_entries).post(handlers::create_calorie_entry),
        )
        .route("/calories/summary", get(handlers::calorie_summary))
        .route("/water", axum::routing::post(handlers::create_water_intake))
        .route("/water/summary", get(handlers::water_summary))
}
