//! Connection pool settings.
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: upper bound on open connections (default: 30)
//! - `DB_MIN_CONNECTIONS`: connections kept warm (default: 0)
//! - `DB_MAX_IDLE_TIME_SECS`: idle connections are closed after this (default: 900)
//! - `DB_ACQUIRE_TIMEOUT_SECS`: wait for a free connection, also bounds the startup ping (default: 5)

use std::env;
use std::time::Duration;

use crate::env_parse;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_idle_time: Duration,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            max_connections: env_parse("DB_MAX_CONNECTIONS", 30),
            min_connections: env_parse("DB_MIN_CONNECTIONS", 0),
            max_idle_time: Duration::from_secs(env_parse("DB_MAX_IDLE_TIME_SECS", 900)),
            acquire_timeout: Duration::from_secs(env_parse("DB_ACQUIRE_TIMEOUT_SECS", 5)),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 30,
            min_connections: 0,
            max_idle_time: Duration::from_secs(900),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}
