//! Per-client request limiter.
//!
//! Owned by `AppState` and applied as router middleware; there is no global
//! limiter instance. Each client may burst up to `limit` requests, after
//! which capacity returns at one request every `window / limit`.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota,
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

pub struct RateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    window: Duration,
}

impl RateLimiter {
    /// A zero `limit` is treated as one request per window.
    pub fn new(limit: usize, window: Duration) -> Self {
        let burst = NonZeroU32::new(u32::try_from(limit).unwrap_or(u32::MAX))
            .unwrap_or(NonZeroU32::MIN);
        let period = (window / burst.get()).max(Duration::from_nanos(1));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: governor::RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admits one request from `client`. On rejection returns how long until
    /// the client may send again.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&client.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Forgets clients whose capacity has fully recovered.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

/// Peer address of the request, or the first `X-Forwarded-For` hop when
/// `trust_forwarded` is set. Falls back to "unknown".
pub fn client_identity<B>(req: &Request<B>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(forwarded) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_identity(&req, state.config.trust_forwarded_for);
    if let Err(retry_after) = state.rate_limiter.check(&client) {
        debug!(%client, retry_after_ms = retry_after.as_millis() as u64, "rate limit exceeded");
        return Err(AppError::TooManyRequests {
            retry_after_secs: whole_seconds(retry_after),
        });
    }
    Ok(next.run(req).await)
}

/// Rounds up, never below one second.
fn whole_seconds(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
