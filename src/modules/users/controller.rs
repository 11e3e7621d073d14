use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use courierds_core::{AppError, ErrorResponse};
use courierds_models::{CreateUserDto, UpdateUserDto, User, UserId};
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

/// List all users
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users ordered by creation", body = Vec<User>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(&state.db).await?;
    Ok(Json(users))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/admin/user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error or duplicate user", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Edit a user's username, email or role
#[utoipa::path(
    patch,
    path = "/admin/user/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error, malformed id or duplicate user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin or targets their own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<UserId>,
) -> Result<StatusCode, AppError> {
    if admin.id() == id {
        return Err(AppError::forbidden("admins cannot delete their own account"));
    }

    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
