#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use workout_tracker::db::{create_memory_pool, DbPool};
use workout_tracker::migrations::run_migrations_for_tests;
use workout_tracker::models::{User, UserRole};
use workout_tracker::repositories::UserRepository;
use workout_tracker::routes::{cors_layer, create_router};
use workout_tracker::token::TokenService;

pub const TEST_PASSWORD: &str = "password123";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn token_service() -> TokenService {
    TokenService::new("test-secret", 1)
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_router(pool, token_service(), cors_layer(None))
}

pub async fn create_test_user(pool: &DbPool, username: &str, role: UserRole) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(
            username,
            &format!("{}@example.com", username),
            TEST_PASSWORD,
            role,
        )
        .await
        .unwrap()
}

/// A bearer token for `user`, signed with the test app's secret.
pub fn token_for(user: &User) -> String {
    token_service().issue(user, None).unwrap()
}

/// Sends a JSON request and returns the status with the parsed body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
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
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// A regular user and their token, ready to call the API.
pub async fn user_with_token(pool: &DbPool, username: &str) -> (User, String) {
    let user = create_test_user(pool, username, UserRole::User).await;
    let token = token_for(&user);
    (user, token)
}

pub async fn admin_with_token(pool: &DbPool, username: &str) -> (User, String) {
    let user = create_test_user(pool, username, UserRole::Admin).await;
    let token = token_for(&user);
    (user, token)
}
