#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use courierds::router::init_router;
use courierds::state::AppState;
use courierds_auth::create_access_token;
use courierds_config::{
    BasicAuthConfig, CorsConfig, JwtConfig, RateLimitConfig, ServerConfig,
};
use courierds_core::hash_password;
use courierds_models::{UserId, UserRole};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "Courier#2024";
pub const HEALTH_USER: &str = "probe";
pub const HEALTH_PASSWORD: &str = "probe-secret";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        issuer: "courierds".to_string(),
        audience: "courierds-api".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn test_state(pool: PgPool, rate_limit: &RateLimitConfig) -> AppState {
    let mut state = AppState::from_pool(pool, rate_limit);
    state.jwt_config = test_jwt_config();
    state.basic_auth_config = BasicAuthConfig {
        username: HEALTH_USER.to_string(),
        password: HEALTH_PASSWORD.to_string(),
    };
    state.cors_config = CorsConfig::default();
    state.server_config = ServerConfig {
        environment: "test".to_string(),
        ..ServerConfig::default()
    };
    state
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool, &RateLimitConfig::disabled()))
}

pub struct TestUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl TestUser {
    pub fn token(&self) -> String {
        create_access_token(self.id.into_inner(), self.role.as_str(), &test_jwt_config()).unwrap()
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_username() -> String {
    format!("user_{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn create_test_user(tx: &mut Transaction<'_, Postgres>, role: UserRole) -> TestUser {
    let username = generate_unique_username();
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        email,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

pub async fn create_committed_user(pool: &PgPool, role: UserRole) -> TestUser {
    let mut tx = pool.begin().await.unwrap();
    let user = create_test_user(&mut tx, role).await;
    tx.commit().await.unwrap();
    user
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

pub async fn user_role(pool: &PgPool, id: UserId) -> UserRole {
    sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}
