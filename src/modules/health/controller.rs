use axum::{Json, extract::State};
use courierds_core::ErrorResponse;
use courierds_models::HealthResponse;

use crate::state::AppState;

/// Liveness probe
///
/// Does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 401, description = "Missing or wrong basic-auth credentials", body = ErrorResponse)
    ),
    security(("basic_auth" = [])),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::available(
        &state.server_config.environment,
        &state.server_config.version,
    ))
}
