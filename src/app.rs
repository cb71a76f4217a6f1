use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id/complete", post(handlers::complete_habit))
        .route("/api/habits/:id/pause", post(handlers::pause_habit))
        .route("/api/activities", get(handlers::list_activities).post(handlers::create_activity))
        .route("/api/activities/:id/sessions", post(handlers::log_session))
        .route("/api/categories", get(handlers::list_categories).post(handlers::create_category))
        .route("/api/days", post(handlers::flag_day))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/fitness", get(handlers::get_fitness))
        .with_state(state)
}
