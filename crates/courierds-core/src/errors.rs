use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

pub mod codes {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const UNAUTHENTICATED: &str = "unauthenticated";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const RATE_LIMITED: &str = "rate_limited";
    pub const PERSISTENCE_FAILURE: &str = "persistence_failure";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: Error,
    retry_after: Option<u64>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::with_code(status, default_code(status), err)
    }

    pub fn with_code<E>(status: StatusCode, code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
            retry_after: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    /// Duplicate resource. Shares the 400 status with validation failures
    /// and is told apart by its code.
    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::with_code(StatusCode::BAD_REQUEST, codes::CONFLICT, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::PERSISTENCE_FAILURE,
            err,
        )
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        let mut err = Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            anyhow!("rate limit exceeded, retry in {} seconds", retry_after_secs),
        );
        err.retry_after = Some(retry_after_secs);
        err
    }

    /// Message exposed to the client. Only the outermost context of a
    /// server-side failure leaves the process.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

fn default_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => codes::VALIDATION_ERROR,
        StatusCode::UNAUTHORIZED => codes::UNAUTHENTICATED,
        StatusCode::FORBIDDEN => codes::FORBIDDEN,
        StatusCode::NOT_FOUND => codes::NOT_FOUND,
        StatusCode::CONFLICT => codes::CONFLICT,
        StatusCode::TOO_MANY_REQUESTS => codes::RATE_LIMITED,
        _ => codes::INTERNAL_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status.as_u16(),
                code = %self.code,
                error = ?self.error,
                "Request failed"
            );
        }

        let body = Json(ErrorResponse {
            error: self.message(),
            code: self.code.to_string(),
        });

        let mut response = (self.status, body).into_response();
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_status_maps_to_code() {
        assert_eq!(
            AppError::bad_request(anyhow!("bad")).code,
            codes::VALIDATION_ERROR
        );
        assert_eq!(AppError::unauthorized("no").code, codes::UNAUTHENTICATED);
        assert_eq!(AppError::forbidden("no").code, codes::FORBIDDEN);
        assert_eq!(AppError::not_found(anyhow!("gone")).code, codes::NOT_FOUND);
        assert_eq!(
            AppError::internal_error("boom").code,
            codes::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_conflict_is_bad_request_with_own_code() {
        let err = AppError::conflict(anyhow!("user already has an application"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, codes::CONFLICT);
    }

    #[test]
    fn test_database_error_hides_driver_detail() {
        let source: Result<(), std::io::Error> = Err(std::io::Error::other("socket closed"));
        let err = AppError::database(source.context("failed to fetch users").unwrap_err());

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, codes::PERSISTENCE_FAILURE);
        assert_eq!(err.message(), "failed to fetch users");
    }

    #[test]
    fn test_too_many_requests_sets_retry_after() {
        let response = AppError::too_many_requests(3).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            HeaderValue::from(3u64)
        );
    }

    #[test]
    fn test_from_std_error_is_internal() {
        let err: AppError = std::io::Error::other("disk").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, codes::INTERNAL_ERROR);
    }
}
