use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::check_order;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{MuscleSize, MuscleSizeInput};
use crate::repositories::{MuscleRepository, MuscleSizeRepository};
use crate::validation;

#[derive(Clone)]
pub struct MuscleSizesState {
    pub muscle_size_repo: MuscleSizeRepository,
    pub muscle_repo: MuscleRepository,
}

#[derive(Debug, Deserialize)]
pub struct MuscleSizeQuery {
    pub muscle_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn not_found() -> AppError {
    AppError::NotFound("Muscle size not found".to_string())
}

pub async fn list(
    State(state): State<MuscleSizesState>,
    auth_user: AuthUser,
    Query(query): Query<MuscleSizeQuery>,
) -> Result<Json<Vec<MuscleSize>>> {
    check_order(query.from, query.to)?;
    let sizes = state
        .muscle_size_repo
        .find_by_user(
            &auth_user.id,
            query.muscle_id.as_deref(),
            query.from,
            query.to,
        )
        .await?;
    Ok(Json(sizes))
}

pub async fn show(
    State(state): State<MuscleSizesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MuscleSize>> {
    state
        .muscle_size_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<MuscleSizesState>,
    auth_user: AuthUser,
    Json(input): Json<MuscleSizeInput>,
) -> Result<(StatusCode, Json<MuscleSize>)> {
    let size = validation::muscle_size(input.size)?;
    check_muscle(&state, &input.muscle_id).await?;

    let entry = state
        .muscle_size_repo
        .create(&auth_user.id, &input.muscle_id, input.date, size)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    State(state): State<MuscleSizesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<MuscleSizeInput>,
) -> Result<Json<MuscleSize>> {
    let size = validation::muscle_size(input.size)?;
    check_muscle(&state, &input.muscle_id).await?;

    if !state
        .muscle_size_repo
        .update(&id, &auth_user.id, &input.muscle_id, input.date, size)
        .await?
    {
        return Err(not_found());
    }

    state
        .muscle_size_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete(
    State(state): State<MuscleSizesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.muscle_size_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn check_muscle(state: &MuscleSizesState, muscle_id: &str) -> Result<()> {
    state
        .muscle_repo
        .find_by_id(muscle_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Muscle not found".to_string()))
}
