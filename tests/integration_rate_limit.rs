mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::test_state;
use courierds::router::init_router;
use courierds_config::RateLimitConfig;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        auth_per_second: 1,
        auth_burst_size: 1,
    }
}

fn login_request(client_ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client_ip)
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": "test@example.com",
                "password": "Password@123"
            }))
            .unwrap(),
        ))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let app = init_router(test_state(pool, &strict_rate_limit_config()));

    // first attempt is processed and fails on credentials
    let response = app.clone().oneshot(login_request("192.168.1.100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(login_request("192.168.1.100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_is_per_client(pool: PgPool) {
    let app = init_router(test_state(pool, &strict_rate_limit_config()));

    let response = app.clone().oneshot(login_request("10.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(login_request("10.0.0.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_auth_routes_are_not_limited(pool: PgPool) {
    let app = init_router(test_state(pool, &strict_rate_limit_config()));

    for _ in 0..3 {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .header("x-forwarded-for", "10.0.0.3")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
