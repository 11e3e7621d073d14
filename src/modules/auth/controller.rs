use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use courierds_core::{AppError, ErrorResponse};
use courierds_models::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, SignupRequest,
    UpdateProfileDto, User,
};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::{AUTH_COOKIE, AuthUser};
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn session_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        AUTH_COOKIE,
        token,
        max_age_secs.max(0)
    ))
    .map_err(|e| AppError::internal_error(format!("failed to build session cookie: {}", e)))
}

/// Create an account with the `user` role
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Validation error, password mismatch or duplicate user", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::signup(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a session token
///
/// The token is returned in the body and set as the `jwt` cookie.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    let cookie = session_cookie(&response.token, state.jwt_config.access_token_expiry)?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(response),
    ))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = MessageResponse)),
    tag = "Authentication"
)]
pub async fn logout() -> Result<impl IntoResponse, AppError> {
    let cookie = session_cookie("", 0)?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(MessageResponse::new("logged out")),
    ))
}

/// Profile of the caller
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// Update the caller's username or email
#[utoipa::path(
    patch,
    path = "/auth/update-profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Validation error or taken username/email", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::update_profile(&state.db, auth_user.id(), dto).await?;
    Ok(Json(user))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/auth/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Mismatch, weak password or password reuse", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong old password", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.id()))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::change_password(&state.db, auth_user.id(), dto).await?;
    Ok(Json(MessageResponse::new("password changed successfully")))
}
