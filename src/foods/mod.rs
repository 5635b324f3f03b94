mod dto;
mod handlers;
pub mod repo;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods", get(handlers::list_foods).post(handlers::create_food))
        .route(
            "/foods/:id",
            get(handlers::get_food)
                .put(handlers::update_food)
                .delete(handlers::delete_food),
        )
}
