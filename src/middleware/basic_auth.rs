use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use courierds_core::AppError;
use tracing::warn;

use crate::state::AppState;

const REALM: &str = "Basic realm=\"restricted\", charset=\"UTF-8\"";

fn unauthorized(message: &str) -> Response {
    let mut response = AppError::unauthorized(message).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM));
    response
}

/// Guards a route with the configured basic-auth credentials.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let credentials =
        TypedHeader::<Authorization<Basic>>::from_request_parts(&mut parts, &state).await;

    match credentials {
        Ok(TypedHeader(Authorization(basic)))
            if state
                .basic_auth_config
                .matches(basic.username(), basic.password()) =>
        {
            next.run(Request::from_parts(parts, body)).await
        }
        Ok(_) => {
            warn!(path = %parts.uri.path(), "Basic auth credentials rejected");
            unauthorized("invalid authentication credentials")
        }
        Err(_) => unauthorized("you must be authenticated to access this resource"),
    }
}
