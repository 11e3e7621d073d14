//! Rate limiting configuration for the credential endpoints.
//!
//! Signup and login are limited per client IP with a token bucket from the
//! Governor crate:
//!
//! - Tokens are added at the configured rate (per second)
//! - Each request consumes one token
//! - Burst size defines the maximum tokens that can accumulate
//! - Requests are rejected with `429` when no tokens are available
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: turn limiting off entirely (default: true)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: tokens replenished per second (default: 1)
//! - `RATE_LIMIT_AUTH_BURST`: bucket size (default: 5)

use std::num::NonZeroU32;

use governor::Quota;

use crate::{env_flag, env_parse};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth_per_second: u32,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 1,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", default.enabled),
            auth_per_second: env_parse("RATE_LIMIT_AUTH_PER_SECOND", default.auth_per_second),
            auth_burst_size: env_parse("RATE_LIMIT_AUTH_BURST", default.auth_burst_size),
        }
    }

    /// Limits switched off, used by tests driving the router without a socket.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Quota for the auth bucket. Zero values are clamped to one.
    pub fn auth_quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.auth_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.auth_burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(per_second).allow_burst(burst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.auth_per_second, 1);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_disabled() {
        assert!(!RateLimitConfig::disabled().enabled);
    }

    #[test]
    fn test_auth_quota_burst() {
        let config = RateLimitConfig {
            enabled: true,
            auth_per_second: 2,
            auth_burst_size: 7,
        };
        assert_eq!(config.auth_quota().burst_size().get(), 7);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let config = RateLimitConfig {
            enabled: true,
            auth_per_second: 0,
            auth_burst_size: 0,
        };
        assert_eq!(config.auth_quota().burst_size().get(), 1);
    }
}
