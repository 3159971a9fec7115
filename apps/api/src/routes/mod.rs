pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::rate_limit::enforce_rate_limit;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let api = Router::new()
        // Resume API
        .route(
            "/api/v1/resumes/parse",
            post(resume::handle_parse_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Matching API
        .route("/api/v1/matches", post(matching::handle_match))
        .route(
            "/api/v1/jobs/:job_id/matches",
            post(matching::handle_batch_match),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates",
            get(matching::handle_top_candidates),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .with_state(state)
}
