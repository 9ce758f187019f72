use std::ops::Deref;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::AppError;
use crate::models::UserRole;
use crate::repositories::UserRepository;
use crate::token::TokenService;

/// The caller, resolved from the `Authorization: Bearer` token.
///
/// The role is re-read from the database on every request so promotions and
/// deletions take effect without waiting for tokens to expire.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub impersonator: Option<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = parts
            .extensions
            .get::<TokenService>()
            .cloned()
            .ok_or_else(|| AppError::Internal("token service not configured".to_string()))?;
        let user_repo = parts
            .extensions
            .get::<UserRepository>()
            .cloned()
            .ok_or_else(|| AppError::Internal("user repository not configured".to_string()))?;

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;

        let claims = tokens.verify(bearer.token())?;

        let user = user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            role: user.role,
            impersonator: claims.impersonator,
        })
    }
}

/// An authenticated caller holding the admin role.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

impl Deref for AdminUser {
    type Target = AuthUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}
