use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{AuthResponse, CreateUser, LoginCredentials, User, UserRole};
use crate::repositories::UserRepository;
use crate::token::TokenService;
use crate::validation;

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub tokens: TokenService,
}

#[derive(Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impersonator: Option<String>,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

pub async fn register(
    State(state): State<AuthState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let username = validation::username(&input.username)?;
    let email = validation::email(&input.email)?;
    validation::password(&input.password)?;

    let user = state
        .user_repo
        .register(&username, &email, &input.password)
        .await?;
    tracing::info!("Registered user {} with role {}", user.username, user.role.as_str());

    let token = state.tokens.issue(&user, None)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AuthState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .user_repo
        .verify_password(credentials.username.trim(), &credentials.password)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Failed login for {}", credentials.username);
            AppError::Unauthorized
        })?;

    let token = state.tokens.issue(&user, None)?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(State(state): State<AuthState>, auth_user: AuthUser) -> Result<Json<MeResponse>> {
    let user = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(MeResponse {
        user,
        impersonator: auth_user.impersonator,
    }))
}

// Admin user management

pub async fn list_users(
    State(state): State<AuthState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>> {
    Ok(Json(state.user_repo.find_all().await?))
}

pub async fn create_user(
    State(state): State<AuthState>,
    admin: AdminUser,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let username = validation::username(&input.username)?;
    let email = validation::email(&input.email)?;
    validation::password(&input.password)?;

    let user = state
        .user_repo
        .create(&username, &email, &input.password, input.role)
        .await?;
    tracing::info!("{} created user {}", admin.username, user.username);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn delete_user(
    State(state): State<AuthState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !state.user_repo.delete(&id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!("{} deleted user {}", admin.username, id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn promote_user(
    State(state): State<AuthState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    if !state.user_repo.update_role(&id, UserRole::Admin).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let user = state
        .user_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!("{} promoted {} to admin", admin.username, user.username);

    Ok(Json(user))
}

/// Issues a token for `id` that remembers which admin asked for it.
pub async fn impersonate(
    State(state): State<AuthState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<AuthResponse>> {
    if admin.impersonator.is_some() {
        return Err(AppError::Forbidden(
            "Cannot impersonate while impersonating".to_string(),
        ));
    }

    let user = state
        .user_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if user.role.is_admin() {
        return Err(AppError::Forbidden(
            "Administrators cannot be impersonated".to_string(),
        ));
    }

    tracing::warn!("{} is impersonating {}", admin.username, user.username);
    let token = state.tokens.issue(&user, Some(&admin.id))?;
    Ok(Json(AuthResponse { token, user }))
}
