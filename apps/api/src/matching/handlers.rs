use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::batch::{score_candidates, Candidate};
use crate::models::{CandidateProfile, JobRequirement, MatchKey, MatchResult};
use crate::state::AppState;

pub const DEFAULT_CANDIDATE_LIMIT: usize = 10;

fn default_enhance() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub profile: CandidateProfile,
    pub job: JobRequirement,
    #[serde(default = "default_enhance")]
    pub enhance: bool,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub job: JobRequirement,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default = "default_enhance")]
    pub enhance: bool,
}

#[derive(Debug, Deserialize)]
pub struct CandidatesQuery {
    pub limit: Option<usize>,
}

/// POST /api/v1/matches
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let key = MatchKey::new(req.resume_id, req.job_id);
    let base = state.scorer.score(key, &req.profile, &req.job);

    let result = match (&state.enhancer, req.enhance) {
        (Some(enhancer), true) => {
            let cancel = CancellationToken::new();
            let _guard = cancel.clone().drop_guard();
            enhancer
                .apply(base, &req.profile.raw_text, &req.job.description, &cancel)
                .await
        }
        _ => base,
    };

    let replaced = state.results.upsert(result.clone());
    info!(
        resume_id = %result.resume_id,
        job_id = %result.job_id,
        score = result.score,
        ai_enhanced = result.ai_enhanced,
        replaced,
        "match scored"
    );
    Ok(Json(result))
}

/// POST /api/v1/jobs/:job_id/matches
pub async fn handle_batch_match(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<BatchMatchRequest>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let enhancer = if req.enhance {
        state.enhancer.clone()
    } else {
        None
    };

    // Cancels in-flight enhancement when the client goes away.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let results = score_candidates(
        Arc::clone(&state.scorer),
        job_id,
        Arc::new(req.job),
        req.candidates,
        enhancer,
        state.batch_options(),
        cancel,
    )
    .await;

    for result in &results {
        state.results.upsert(result.clone());
    }
    Ok(Json(results))
}

/// GET /api/v1/jobs/:job_id/candidates
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<CandidatesQuery>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_CANDIDATE_LIMIT);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }
    Ok(Json(state.results.top_for_job(job_id, limit)))
}
