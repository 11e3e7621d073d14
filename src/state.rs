use std::sync::Arc;

use courierds_config::{
    BasicAuthConfig, CorsConfig, DatabaseConfig, JwtConfig, RateLimitConfig, ServerConfig,
};
use courierds_db::init_db_pool;
use sqlx::PgPool;

use crate::middleware::rate_limit::AuthRateLimiter;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub basic_auth_config: BasicAuthConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    /// `None` when rate limiting is switched off.
    pub auth_rate_limiter: Option<Arc<AuthRateLimiter>>,
}

impl AppState {
    /// State around an existing pool with configuration read from the
    /// environment.
    pub fn from_pool(db: PgPool, rate_limit_config: &RateLimitConfig) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            basic_auth_config: BasicAuthConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            server_config: ServerConfig::from_env(),
            auth_rate_limiter: AuthRateLimiter::from_config(rate_limit_config),
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool(&DatabaseConfig::from_env()).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    Ok(AppState::from_pool(db, &RateLimitConfig::from_env()))
}
