use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/day", get(handlers::get_day))
        .route("/api/day/reset", post(handlers::reset_day))
        .route("/api/goals", put(handlers::put_goals))
        .route("/api/entries", post(handlers::add_entry))
        .route("/api/entries/:id", delete(handlers::remove_entry))
        .route("/api/history", get(handlers::get_history))
        .route(
            "/api/search",
            get(handlers::search).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
