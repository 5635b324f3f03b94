mod dto;
mod handlers;
pub mod repo;
pub mod service;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::get_profile)
                .post(handlers::create_profile)
                .put(handlers::update_profile),
        )
        .route("/profile/weight", put(handlers::update_weight))
}
