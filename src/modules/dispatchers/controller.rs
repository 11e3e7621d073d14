use anyhow::anyhow;
use axum::{Json, extract::State, http::StatusCode};
use courierds_core::{AppError, ErrorResponse};
use courierds_models::{
    ApplyDispatcherDto, Dispatcher, DispatcherApplication, ReviewResponse,
};
use tracing::instrument;

use super::service::{DispatcherService, ReviewOutcome};
use crate::middleware::application::{ApplicationById, ApplicationByUserId};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

pub const APPROVED_MESSAGE: &str = "Dispatch application approved";
pub const REJECTED_MESSAGE: &str = "Dispatch application rejected";
pub const ALREADY_APPROVED_MESSAGE: &str = "Dispatch application already approved";

/// Apply to become a dispatcher
///
/// Field formats are not checked here; they decide the outcome of the
/// admin review instead.
#[utoipa::path(
    post,
    path = "/dispatchers/apply",
    request_body = ApplyDispatcherDto,
    responses(
        (status = 201, description = "Application submitted", body = DispatcherApplication),
        (status = 400, description = "Validation error or existing application", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller may not apply", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dispatchers"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.id()))]
pub async fn apply(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ApplyDispatcherDto>,
) -> Result<(StatusCode, Json<DispatcherApplication>), AppError> {
    let application = DispatcherService::apply(&state.db, &auth_user.0, dto).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Get the caller's own application
#[utoipa::path(
    get,
    path = "/dispatchers/application",
    responses(
        (status = 200, description = "Caller's application", body = DispatcherApplication),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No application on file", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dispatchers"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.id()))]
pub async fn my_application(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DispatcherApplication>, AppError> {
    DispatcherService::find_by_user_id(&state.db, auth_user.id())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(anyhow!("dispatcher application not found")))
}

/// List all dispatcher applications
#[utoipa::path(
    get,
    path = "/admin/dispatcher-applications",
    responses(
        (status = 200, description = "Applications ordered by creation", body = Vec<DispatcherApplication>),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<DispatcherApplication>>, AppError> {
    let applications = DispatcherService::list_applications(&state.db).await?;
    Ok(Json(applications))
}

/// Get one application by its id
#[utoipa::path(
    get,
    path = "/admin/dispatcher-applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application", body = DispatcherApplication),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_application(
    ApplicationById(application): ApplicationById,
) -> Json<DispatcherApplication> {
    Json(application)
}

/// Review the application owned by `user_id`
///
/// Approval creates the dispatcher and promotes the user. Rejection deletes
/// the application so the user may apply again.
#[utoipa::path(
    patch,
    path = "/admin/approve-dispatcher/{user_id}",
    params(("user_id" = String, Path, description = "Applicant's user id")),
    responses(
        (status = 201, description = "Approved; dispatcher created", body = ReviewResponse),
        (status = 200, description = "Rejected, or already approved", body = ReviewResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Promotion failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, application), fields(application_id = %application.id))]
pub async fn review_application(
    State(state): State<AppState>,
    ApplicationByUserId(application): ApplicationByUserId,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let (status, body) = match DispatcherService::review(&state.db, application).await? {
        ReviewOutcome::Approved(dispatcher) => (
            StatusCode::CREATED,
            ReviewResponse {
                message: APPROVED_MESSAGE.to_string(),
                dispatcher: Some(dispatcher),
            },
        ),
        ReviewOutcome::Rejected => (
            StatusCode::OK,
            ReviewResponse {
                message: REJECTED_MESSAGE.to_string(),
                dispatcher: None,
            },
        ),
        ReviewOutcome::AlreadyApproved => (
            StatusCode::OK,
            ReviewResponse {
                message: ALREADY_APPROVED_MESSAGE.to_string(),
                dispatcher: None,
            },
        ),
    };

    Ok((status, Json(body)))
}

/// List promoted dispatchers
#[utoipa::path(
    get,
    path = "/admin/dispatchers",
    responses(
        (status = 200, description = "Dispatchers ordered by approval", body = Vec<Dispatcher>),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn list_dispatchers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Dispatcher>>, AppError> {
    let dispatchers = DispatcherService::list_dispatchers(&state.db).await?;
    Ok(Json(dispatchers))
}
