mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::setup_test_app;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

// base64 of "probe:probe-secret" and "probe:wrong"
const VALID_CREDENTIALS: &str = "Basic cHJvYmU6cHJvYmUtc2VjcmV0";
const WRONG_CREDENTIALS: &str = "Basic cHJvYmU6d3Jvbmc=";

fn health_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/health");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_with_valid_credentials(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app.oneshot(health_request(Some(VALID_CREDENTIALS))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "available");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["message"], "CDS Application is healthy");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_without_credentials_challenges(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app.oneshot(health_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(challenge.starts_with("Basic realm=\"restricted\""));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_with_wrong_credentials(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app.oneshot(health_request(Some(WRONG_CREDENTIALS))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_rejects_bearer_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app
        .oneshot(health_request(Some("Bearer some.jwt.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
