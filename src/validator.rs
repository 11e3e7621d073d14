use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use courierds_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

pub(crate) fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join(", ")
}

fn between_backticks(message: &str, marker: &str) -> Option<String> {
    message
        .split(marker)
        .nth(1)
        .and_then(|s| s.split('`').next())
        .map(str::to_string)
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = between_backticks(&error_msg, "missing field `")
            .unwrap_or_else(|| "unknown".to_string());
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if error_msg.contains("unknown variant") {
        let value = between_backticks(&error_msg, "unknown variant `").unwrap_or_default();
        let expected = error_msg
            .split("expected ")
            .nth(1)
            .map(|s| s.split(" at line").next().unwrap_or(s).replace('`', ""))
            .unwrap_or_default();
        return AppError::bad_request(anyhow!(
            "invalid value `{}`, expected {}",
            value,
            expected
        ));
    }

    if error_msg.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// JSON body that has passed its `validator` rules. Every failure is a
/// `400` with code `validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

/// Path parameters parsed into `T`. A malformed segment is a `400` with code
/// `validation_error` instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!("{}", rejection.body_text())))?;
        Ok(ValidatedPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3, message = "name is too short"))]
        name: String,
        kind: PayloadKind,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum PayloadKind {
        Car,
        Motorcycle,
    }

    async fn extract(body: &str, content_type: Option<&str>) -> Result<Payload, AppError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        ValidatedJson::<Payload>::from_request(req, &())
            .await
            .map(|ValidatedJson(v)| v)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let payload = extract(r#"{"name":"abc","kind":"car"}"#, Some("application/json"))
            .await
            .unwrap();
        assert_eq!(payload.name, "abc");
        assert!(matches!(payload.kind, PayloadKind::Car));
    }

    #[tokio::test]
    async fn test_missing_field() {
        let err = extract(r#"{"kind":"car"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "name is required");
    }

    #[tokio::test]
    async fn test_unknown_variant() {
        let err = extract(r#"{"name":"abc","kind":"bicycle"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().contains("bicycle"));
        assert!(err.message().contains("motorcycle"));
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let err = extract(r#"{"name":"ab","kind":"motorcycle"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "validation_error");
        assert_eq!(err.message(), "name is too short");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = extract(r#"{"name":"abc","kind":"car"}"#, None)
            .await
            .unwrap_err();
        assert!(err.message().contains("Content-Type"));
    }
}
