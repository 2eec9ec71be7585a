//! Client-side request rate limiting.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as Governor};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Direct (unkeyed) rate limiter shared by clones of a source
///
/// Unlimited unless built with a quota.
#[derive(Clone, Default)]
pub struct RateLimiter {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    rate: Option<NonZeroU32>,
}

impl RateLimiter {
    /// A limiter that never waits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Allow at most `rps` requests per second, spaced evenly (burst of one)
    pub fn per_second(rps: NonZeroU32) -> Self {
        let quota = Quota::per_second(rps).allow_burst(NonZeroU32::MIN);
        let limiter: DefaultDirectRateLimiter = Governor::direct(quota);
        Self {
            limiter: Some(Arc::new(limiter)),
            rate: Some(rps),
        }
    }

    /// Build from an optional configured rate; `None` or zero means unlimited
    pub fn from_rate(rps: Option<u32>) -> Self {
        rps.and_then(NonZeroU32::new)
            .map(Self::per_second)
            .unwrap_or_default()
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until a request may be sent
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_from_rate() {
        assert!(!RateLimiter::from_rate(None).is_limited());
        assert!(!RateLimiter::from_rate(Some(0)).is_limited());
        assert!(RateLimiter::from_rate(Some(5)).is_limited());
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();
        let started = Instant::now();
        for _ in 0..100 {
            limiter.until_ready().await;
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_limited_spaces_requests() {
        let limiter = RateLimiter::from_rate(Some(10));
        let started = Instant::now();
        // The first request is free; the next two wait ~100ms each.
        for _ in 0..3 {
            limiter.until_ready().await;
        }
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_clones_share_quota() {
        let limiter = RateLimiter::from_rate(Some(1));
        let clone = limiter.clone();
        let inner = limiter.limiter.as_ref().unwrap();
        assert!(inner.check().is_ok());
        assert!(clone.limiter.as_ref().unwrap().check().is_err());
    }
}
