//! Access token creation and verification.
//!
//! Tokens are signed with HS256 only. Verification rejects a token that
//! is signed with any other algorithm, lacks one of [`REQUIRED_CLAIMS`],
//! names another issuer or audience, is expired, or is not yet valid.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use courierds_config::JwtConfig;
use courierds_core::AppError;

use crate::claims::Claims;

pub const REQUIRED_CLAIMS: [&str; 7] = ["sub", "role", "iss", "aud", "iat", "nbf", "exp"];

/// Issues an access token for `user_id` carrying `role`.
///
/// The token lifetime comes from `jwt_config.access_token_expiry`.
pub fn create_access_token(
    user_id: Uuid,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
        iat: now,
        nbf: now,
        exp: now + jwt_config.access_token_expiry,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("failed to create token: {}", e)))
}

fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt_config.issuer.as_str()]);
    validation.set_audience(&[jwt_config.audience.as_str()]);
    // `role` and `iat` are enforced when the claims deserialize.
    validation.set_required_spec_claims(&["sub", "iss", "aud", "nbf", "exp"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation
}

/// Verifies signature, algorithm, issuer, audience and time window, then
/// returns the claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(reason = ?e.kind(), "Token verification failed");
        AppError::unauthorized("invalid or expired token")
    })
}
