use std::sync::Arc;

use crate::config::Config;
use crate::matching::batch::BatchOptions;
use crate::matching::enhancement::EnhancementAdapter;
use crate::matching::scorer::{HeuristicScorer, MatchScorer};
use crate::matching::store::MatchResultStore;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// None when no enhancement backend is configured.
    pub enhancer: Option<EnhancementAdapter>,
    pub results: Arc<MatchResultStore>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, enhancer: Option<EnhancementAdapter>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window);
        Self {
            scorer: Arc::new(HeuristicScorer),
            enhancer,
            results: Arc::new(MatchResultStore::new()),
            rate_limiter: Arc::new(rate_limiter),
            config,
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            concurrency: self.config.batch_concurrency,
            deadline: self.config.batch_deadline,
        }
    }
}
