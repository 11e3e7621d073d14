//! Role-based authorization.
//!
//! Two equivalent entry points:
//! 1. Layer-based middleware (`require_admin`, `require_applicant`) for whole routers
//! 2. Extractors (`RequireAdmin`) for single handlers
//!
//! Both resolve the caller through [`AuthUser`] and compare the role stored
//! for that user, not the role embedded in the token.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use courierds_core::AppError;
use courierds_models::UserRole;
use tracing::warn;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fails with `403` unless `role` is in `allowed_roles`.
pub fn check_role(role: UserRole, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if allowed_roles.contains(&role) {
        return Ok(());
    }

    let allowed = allowed_roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::forbidden(format!(
        "access denied, required role: {}",
        allowed
    )))
}

/// Middleware checking the caller against `allowed_roles`.
///
/// ```rust,ignore
/// Router::new()
///     .route("/reports", get(reports))
///     .route_layer(middleware::from_fn_with_state(state.clone(), |state, req, next| {
///         require_roles(state, req, next, &[UserRole::Admin])
///     }));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if let Err(err) = check_role(auth_user.role(), allowed_roles) {
        warn!(
            user_id = %auth_user.id(),
            role = %auth_user.role(),
            "Role gate denied request"
        );
        return Err(err);
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Accounts that may apply to become dispatchers.
pub async fn require_applicant(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        &[UserRole::User, UserRole::Dispatcher],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor for admin-only handlers.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(auth_user.role(), &[UserRole::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_check_role_allows_listed_role() {
        assert!(check_role(UserRole::Admin, &[UserRole::Admin]).is_ok());
        assert!(check_role(UserRole::User, &[UserRole::User, UserRole::Dispatcher]).is_ok());
    }

    #[test]
    fn test_check_role_denies_with_forbidden() {
        let err = check_role(UserRole::Dispatcher, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "forbidden");
        assert!(err.message().contains("admin"));
    }

    #[test]
    fn test_check_role_empty_allow_list_denies_everyone() {
        assert!(check_role(UserRole::Admin, &[]).is_err());
    }
}
