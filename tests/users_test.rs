mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_user_admin_routes_require_admin() {
    let pool = common::setup_test_db();
    let (_, token) = common::user_with_token(&pool, "regular").await;
    let (admin, _) = common::admin_with_token(&pool, "boss").await;
    let app = common::create_test_app(pool);

    let (status, body) = common::get(&app, "/api/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (status, _) = common::delete(&app, &format!("/api/users/{}", admin.id), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_and_creates_users() {
    let pool = common::setup_test_db();
    let (_, admin_token) = common::admin_with_token(&pool, "boss").await;
    common::user_with_token(&pool, "regular").await;
    let app = common::create_test_app(pool);

    let (status, body) = common::post(
        &app,
        "/api/users",
        &admin_token,
        json!({"username": "newbie", "email": "newbie@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");

    let (status, body) = common::get(&app, "/api/users", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let pool = common::setup_test_db();
    let (admin, admin_token) = common::admin_with_token(&pool, "boss").await;
    let app = common::create_test_app(pool);

    let (status, _) =
        common::delete(&app, &format!("/api/users/{}", admin.id), &admin_token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_deletes_and_promotes() {
    let pool = common::setup_test_db();
    let (_, admin_token) = common::admin_with_token(&pool, "boss").await;
    let (first, first_token) = common::user_with_token(&pool, "first").await;
    let (second, _) = common::user_with_token(&pool, "second").await;
    let app = common::create_test_app(pool);

    let (status, body) = common::post(
        &app,
        &format!("/api/users/{}/promote", first.id),
        &admin_token,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    // The role is read per request, so the old token now has admin rights.
    let (status, _) = common::get(&app, "/api/users", &first_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        common::delete(&app, &format!("/api/users/{}", second.id), &admin_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        common::delete(&app, &format!("/api/users/{}", second.id), &admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_impersonation() {
    let pool = common::setup_test_db();
    let (admin, admin_token) = common::admin_with_token(&pool, "boss").await;
    let (other_admin, _) = common::admin_with_token(&pool, "boss2").await;
    let (user, _) = common::user_with_token(&pool, "regular").await;
    let app = common::create_test_app(pool);

    let (status, _) = common::post(
        &app,
        &format!("/api/users/{}/impersonate", other_admin.id),
        &admin_token,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = common::post(
        &app,
        &format!("/api/users/{}/impersonate", user.id),
        &admin_token,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = common::get(&app, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user.id.as_str());
    assert_eq!(me["impersonator"], admin.id.as_str());

    // The impersonated session has the target's rights, not the admin's.
    let (status, _) = common::get(&app, "/api/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
