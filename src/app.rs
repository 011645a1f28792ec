use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/cities", get(handlers::get_cities))
        .route("/api/filters", get(handlers::get_filters))
        .route("/api/filters/city", post(handlers::set_city))
        .route("/api/filters/schools", post(handlers::set_schools))
        .route("/api/filters/period", post(handlers::set_period))
        .route(
            "/api/picker/:which",
            get(handlers::get_picker).post(handlers::picker_event),
        )
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/reports", get(handlers::get_reports))
        .route("/api/savings", get(handlers::get_savings))
        .with_state(state)
}
