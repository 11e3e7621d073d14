//! # CourierDS Config
//!
//! Configuration structures loaded from environment variables. Every
//! struct exposes `from_env()`; absent or unparsable values fall back to
//! the documented defaults.
//!
//! - [`server`]: listen port, environment name, version
//! - [`database`]: connection string and pool sizing
//! - [`jwt`]: token signing secret, issuer, audience and lifetime
//! - [`basic_auth`]: credentials guarding the health probe
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: per-IP limits on the credential endpoints

pub mod basic_auth;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use basic_auth::BasicAuthConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

use std::env;
use std::str::FromStr;

pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"),
        Err(_) => default,
    }
}
