use crate::env_string;

/// Credentials for the health probe.
#[derive(Clone, Debug)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl BasicAuthConfig {
    pub fn from_env() -> Self {
        Self {
            username: env_string("BASIC_AUTH_USERNAME", "admin"),
            password: env_string("BASIC_AUTH_PASSWORD", "change-me"),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
