use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits/:id/toggle/:day", post(handlers::toggle_day))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/order", post(handlers::reorder))
        .route("/api/habits/:id", get(handlers::get_habit))
        .route("/api/habits/:id/completions", get(handlers::get_completions))
        .route("/api/habits/:id/tick", post(handlers::tick))
        .route("/api/habits/:id/untick", post(handlers::untick))
        .route("/api/habits/:id/archive", post(handlers::archive_habit))
        .route("/api/habits/:id/restore", post(handlers::restore_habit))
        .route("/api/habits/:id/delete", post(handlers::delete_habit))
        .route("/api/stats", get(handlers::get_stats))
        .route("/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .with_state(state)
}
