//! Extractors that load the dispatcher application named in the path
//! before the handler body runs.

use anyhow::anyhow;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use courierds_core::AppError;
use courierds_models::{ApplicationId, DispatcherApplication, UserId};

use crate::modules::dispatchers::service::DispatcherService;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::not_found(anyhow!("dispatcher application not found"))
}

/// Application addressed by its own id (`/{id}`).
#[derive(Debug, Clone)]
pub struct ApplicationById(pub DispatcherApplication);

impl FromRequestParts<AppState> for ApplicationById {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<ApplicationId>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow!("invalid application id")))?;

        DispatcherService::find_by_id(&state.db, id)
            .await?
            .map(ApplicationById)
            .ok_or_else(not_found)
    }
}

/// Application addressed by the owning user's id (`/{user_id}`).
#[derive(Debug, Clone)]
pub struct ApplicationByUserId(pub DispatcherApplication);

impl FromRequestParts<AppState> for ApplicationByUserId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(user_id) = Path::<UserId>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow!("invalid user id")))?;

        DispatcherService::find_by_user_id(&state.db, user_id)
            .await?
            .map(ApplicationByUserId)
            .ok_or_else(not_found)
    }
}
