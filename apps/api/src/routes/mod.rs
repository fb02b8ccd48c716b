pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the resume itself.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route(
            "/api/v1/job-description",
            post(handlers::handle_resolve_job),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
