use crate::{env_parse, env_string};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime in seconds. Also used as the cookie max-age.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env_string("JWT_SECRET", DEFAULT_SECRET),
            issuer: env_string("JWT_ISSUER", "courierds"),
            audience: env_string("JWT_AUDIENCE", "courierds-api"),
            access_token_expiry: env_parse("JWT_ACCESS_EXPIRY", 86400), // 24 hours
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}
