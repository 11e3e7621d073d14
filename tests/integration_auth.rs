mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    TEST_PASSWORD, create_committed_user, generate_unique_email, generate_unique_username, send,
    setup_test_app,
};
use courierds_models::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn signup_body(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_creates_user_role(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let username = generate_unique_username();
    let email = generate_unique_email();

    let mut body = signup_body(&username, &email);
    body["role"] = json!("admin");

    let (status, body) = send(&app, "POST", "/auth/signup", None, Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], username);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_password_mismatch(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let mut body = signup_body(&generate_unique_username(), &generate_unique_email());
    body["confirm_password"] = json!("Different#2024");

    let (status, body) = send(&app, "POST", "/auth/signup", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "passwords do not match");
    assert_eq!(body["code"], "validation_error");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_weak_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let mut body = signup_body(&generate_unique_username(), &generate_unique_email());
    body["password"] = json!("password");
    body["confirm_password"] = json!("password");

    let (status, _) = send(&app, "POST", "/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_missing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let body = json!({ "username": generate_unique_username(), "password": TEST_PASSWORD });

    let (status, body) = send(&app, "POST", "/auth/signup", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_duplicate_email(pool: PgPool) {
    let existing = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let body = signup_body(&generate_unique_username(), &existing.email);
    let (status, body) = send(&app, "POST", "/auth/signup", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["error"], "a user with this email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success_sets_cookie(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "email": user.email, "password": user.password }))
                .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let token = body["token"].as_str().unwrap();
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["username"], user.username);
    assert!(cookie.starts_with(&format!("jwt={};", token)));
    assert!(cookie.contains("HttpOnly"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email_and_wrong_password_look_alike(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@test.com", "password": TEST_PASSWORD })),
    )
    .await;
    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "Wrong#2024" })),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(wrong_body["error"], "invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_email_is_case_insensitive(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email.to_uppercase(), "password": user.password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_then_login_then_me(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let username = generate_unique_username();
    let email = generate_unique_email();

    let (status, _) = send(&app, "POST", "/auth/signup", None, Some(signup_body(&username, &email))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = login["token"].as_str().unwrap();
    let (status, me) = send(&app, "GET", "/auth/me", Some(token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], username);
    assert_eq!(me["email"], email);
    assert_eq!(me["role"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_accepts_cookie(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::Dispatcher).await;
    let app = setup_test_app(pool.clone());

    let request = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("theme=dark; jwt={}", user.token()))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let (status, body) = send(&app, "GET", "/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthenticated");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("jwt=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_keeps_empty_fields(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());
    let new_username = generate_unique_username();

    let (status, body) = send(
        &app,
        "PATCH",
        "/auth/update-profile",
        Some(&user.token()),
        Some(json!({ "username": new_username, "email": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], new_username);
    assert_eq!(body["email"], user.email);
    assert_eq!(body["role"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_rejects_taken_username(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let other = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "PATCH",
        "/auth/update-profile",
        Some(&user.token()),
        Some(json!({ "username": other.username })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password_flow(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());
    let token = user.token();

    let (status, body) = send(
        &app,
        "PUT",
        "/auth/change-password",
        Some(&token),
        Some(json!({
            "old_password": "Wrong#2024",
            "new_password": "Another#2025",
            "confirm_password": "Another#2025"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid password");

    let (status, body) = send(
        &app,
        "PUT",
        "/auth/change-password",
        Some(&token),
        Some(json!({
            "old_password": TEST_PASSWORD,
            "new_password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "use a different password");

    let (status, _) = send(
        &app,
        "PUT",
        "/auth/change-password",
        Some(&token),
        Some(json!({
            "old_password": TEST_PASSWORD,
            "new_password": "Another#2025",
            "confirm_password": "Another#2025"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "Another#2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password_confirmation_mismatch(pool: PgPool) {
    let user = create_committed_user(&pool, UserRole::User).await;
    let app = setup_test_app(pool.clone());

    let (status, body) = send(
        &app,
        "PUT",
        "/auth/change-password",
        Some(&user.token()),
        Some(json!({
            "old_password": TEST_PASSWORD,
            "new_password": "Another#2025",
            "confirm_password": "Another#2026"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "passwords do not match");
}
