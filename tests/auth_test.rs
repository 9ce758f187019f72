mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use workout_tracker::models::UserRole;

#[tokio::test]
async fn test_first_registered_user_becomes_admin() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "alice", "email": "Alice@Example.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["token"].as_str().is_some());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "bob", "email": "bob@example.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "ALICE", "email": "other@example.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    for body in [
        json!({"username": "al", "email": "al@example.com", "password": "secret1"}),
        json!({"username": "alice", "email": "not-an-email", "password": "secret1"}),
        json!({"username": "alice", "email": "alice@example.com", "password": "123"}),
    ] {
        let (status, body) =
            common::send(&app, Method::POST, "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_login_valid_credentials() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "testuser", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "testuser", "password": common::TEST_PASSWORD})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "testuser");

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = common::get(&app, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "testuser");
    assert!(me.get("impersonator").is_none());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "testuser", UserRole::User).await;
    let app = common::create_test_app(pool);

    for (username, password) in [("testuser", "wrongpassword"), ("nobody", "password123")] {
        let (status, _) = common::send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let pool = common::setup_test_db();
    let (user, token) = common::user_with_token(&pool, "ghost").await;
    let app = common::create_test_app(pool.clone());

    workout_tracker::repositories::UserRepository::new(pool)
        .delete(&user.id)
        .await
        .unwrap();

    let (status, _) = common::get(&app, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = common::send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert!(body["git_version"].as_str().is_some());
}
