use crate::{BrokerError, Result as BrokerErrorResult};

use lc_config::RateLimitConfig;

use std::num::NonZeroU32;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Per-connection inbound event limiter.
///
/// A full window's worth of events may arrive as a burst; the bucket then
/// refills evenly over the window.
pub struct ConnectionRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: RateLimitConfig,
}

impl ConnectionRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(config.window_secs.max(1));
        let quota = Quota::with_period(window / burst.get())
            .map(|quota| quota.allow_burst(burst))
            .unwrap_or_else(|| Quota::per_second(burst));

        Self {
            limiter: RateLimiter::direct(quota),
            config,
        }
    }

    #[track_caller]
    pub fn check(&self) -> BrokerErrorResult<()> {
        self.limiter.check().map_err(|_| BrokerError::RateLimited {
            limit: self.config.max_requests,
            window_secs: self.config.window_secs,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Factory for creating per-connection rate limiters
#[derive(Clone)]
pub struct RateLimiterFactory {
    config: RateLimitConfig,
}

impl RateLimiterFactory {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    pub fn create(&self) -> ConnectionRateLimiter {
        ConnectionRateLimiter::new(self.config.clone())
    }
}

impl Default for RateLimiterFactory {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
