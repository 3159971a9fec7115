//! Batch matching — one job against many candidates.
//!
//! Candidates are scored concurrently (bounded by a semaphore). Enhancement
//! calls share one cancellation token that fires at the batch deadline or
//! when the caller cancels, so total wall-clock time stays bounded.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::matching::enhancement::EnhancementAdapter;
use crate::matching::scorer::MatchScorer;
use crate::models::{CandidateProfile, JobRequirement, MatchKey, MatchResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub resume_id: Uuid,
    pub profile: CandidateProfile,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub concurrency: usize,
    /// Budget for the enhancement calls of the whole batch.
    pub deadline: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            deadline: Duration::from_secs(60),
        }
    }
}

/// Scores every candidate against `job` and returns the results ranked by
/// score (descending), ties broken by resume id.
pub async fn score_candidates(
    scorer: Arc<dyn MatchScorer>,
    job_id: Uuid,
    job: Arc<JobRequirement>,
    candidates: Vec<Candidate>,
    enhancer: Option<EnhancementAdapter>,
    options: BatchOptions,
    cancel: CancellationToken,
) -> Vec<MatchResult> {
    let total = candidates.len();
    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let batch_token = cancel.child_token();

    let deadline_guard = {
        let token = batch_token.clone();
        let deadline = options.deadline;
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            token.cancel();
        })
    };

    let mut tasks = JoinSet::new();
    for candidate in candidates {
        let scorer = Arc::clone(&scorer);
        let job = Arc::clone(&job);
        let permits = Arc::clone(&permits);
        let enhancer = enhancer.clone();
        let token = batch_token.clone();

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            let key = MatchKey::new(candidate.resume_id, job_id);
            let base = scorer.score(key, &candidate.profile, &job);
            match enhancer {
                Some(adapter) => {
                    adapter
                        .apply(base, &candidate.profile.raw_text, &job.description, &token)
                        .await
                }
                None => base,
            }
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => warn!(error = %e, "candidate scoring task failed"),
        }
    }
    deadline_guard.abort();

    rank(&mut results);

    let enhanced = results.iter().filter(|r| r.ai_enhanced).count();
    info!(
        %job_id,
        candidates = total,
        scored = results.len(),
        enhanced,
        "batch matching finished"
    );
    results
}

/// Highest score first; equal scores ordered by resume id.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.resume_id.cmp(&b.resume_id))
    });
}
