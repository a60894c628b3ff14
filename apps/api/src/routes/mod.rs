pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // ATS API
        .route("/api/v1/ats/analyze", post(handlers::handle_analyze))
        .route("/api/v1/ats/parse-jd", post(handlers::handle_parse_jd))
        .route(
            "/api/v1/ats/parse-resume",
            post(handlers::handle_parse_resume),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
