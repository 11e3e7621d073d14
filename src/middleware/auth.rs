use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use courierds_auth::verify_token;
use courierds_core::AppError;
use courierds_models::{User, UserId, UserRole};
use tracing::debug;

use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "jwt";

/// The authenticated caller, loaded fresh from the store.
///
/// Resolved at most once per request. The first extraction memoizes the
/// typed value on the request so a role gate and the handler share one
/// store lookup.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

async fn token_from_parts(parts: &mut Parts, state: &AppState) -> Result<String, AppError> {
    if parts.headers.contains_key(header::AUTHORIZATION) {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("invalid authorization header format"))?;
        return Ok(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<AuthUser>() {
            return Ok(existing.clone());
        }

        let token = token_from_parts(parts, state).await?;
        let claims = verify_token(&token, &state.jwt_config)?;

        let user_id = claims
            .user_id()
            .map(UserId::from)
            .ok_or_else(|| AppError::unauthorized("invalid user id in token"))?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "Token subject no longer exists");
                AppError::unauthorized("user not found")
            })?;

        let auth_user = AuthUser(user);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}
