use crate::{env_parse, env_string};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub version: String,
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", 5100),
            environment: env_string("ENV", "development"),
            version: env_string("APP_VERSION", env!("CARGO_PKG_VERSION")),
            metrics_port: env_parse("METRICS_PORT", 9100),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5100,
            environment: "development".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_port: 9100,
        }
    }
}
