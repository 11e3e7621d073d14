use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in access tokens. All of them are required on
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Role name at issue time
    pub role: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Not-before (Unix timestamp)
    pub nbf: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        uuid::Uuid::parse_str(&self.sub).ok()
    }
}
