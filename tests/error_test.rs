use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use serde_json::Value;
use workout_tracker::error::AppError;

fn render(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = tokio_test::block_on(response.into_body().collect())
        .unwrap()
        .to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_not_found_returns_404() {
    let (status, body) = render(AppError::NotFound("Workout not found".to_string()));

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Workout not found");
}

#[test]
fn test_forbidden_returns_403() {
    let (status, body) = render(AppError::Forbidden("Admin access required".to_string()));

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[test]
fn test_bad_request_returns_400() {
    let (status, _) = render(AppError::BadRequest("Invalid input".to_string()));

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_validation_returns_400() {
    let (status, body) = render(AppError::Validation("Name is required".to_string()));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
}

#[test]
fn test_unauthorized_returns_401() {
    let (status, body) = render(AppError::Unauthorized);

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[test]
fn test_conflict_returns_409() {
    let (status, body) = render(AppError::Conflict("Username already exists".to_string()));

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");
}

#[test]
fn test_internal_hides_details() {
    let (status, body) = render(AppError::Internal("pool exhausted at 3am".to_string()));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal error");
}

#[test]
fn test_password_hash_returns_500() {
    let (status, _) = render(AppError::PasswordHash);

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
