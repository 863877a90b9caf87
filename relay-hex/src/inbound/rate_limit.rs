//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm.

use std::{
    net::SocketAddr,
    num::NonZeroU32,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use relay_types::AppError;

use super::handlers::ApiError;

/// Default number of requests per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length (15 minutes).
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Idle clients are swept out of the limiter every this many checks.
const SWEEP_EVERY: u64 = 1024;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
    checks: AtomicU64,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per window (burst size)
    /// * `window` - Time for a fully drained bucket to refill
    pub fn new(requests: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
            checks: AtomicU64::new(0),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let allowed = self.limiter.check_key(&key.to_string()).is_ok();

        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.sweep();
        }

        allowed
    }

    /// Drops clients whose bucket has fully refilled.
    pub fn sweep(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Identifies the client: peer address, else first `X-Forwarded-For` hop.
fn client_key(request: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return ApiError(AppError::RateLimited).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_reject() {
        let limiter = RateLimiterState::new(2, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_clients_have_separate_buckets() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_zero_config_still_allows_one_request() {
        let limiter = RateLimiterState::new(0, Duration::ZERO);
        assert!(limiter.check("anonymous"));
    }

    #[test]
    fn test_sweep_evicts_idle_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_millis(20));
        for i in 0..50 {
            assert!(limiter.check(&format!("10.0.{}.1", i)));
        }
        assert_eq!(limiter.tracked_clients(), 50);

        std::thread::sleep(Duration::from_millis(80));
        limiter.sweep();

        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_periodic_sweep_bounds_tracked_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_millis(20));
        for i in 0..100 {
            limiter.check(&format!("192.0.2.{}", i));
        }

        std::thread::sleep(Duration::from_millis(80));
        for _ in 0..SWEEP_EVERY {
            limiter.check("198.51.100.1");
        }

        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_sweep_keeps_limited_clients() {
        let limiter = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1"));
        limiter.sweep();

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_client_key_prefers_forwarded_for_without_peer() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.9");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "anonymous");
    }
}
