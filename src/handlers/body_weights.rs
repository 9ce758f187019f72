use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::check_order;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{BodyWeight, BodyWeightInput};
use crate::progress::{summarize_body_weight, BodyWeightSummary, RangeQuery};
use crate::repositories::BodyWeightRepository;
use crate::validation;

#[derive(Clone)]
pub struct BodyWeightsState {
    pub body_weight_repo: BodyWeightRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Body weight not found".to_string())
}

pub async fn list(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<BodyWeight>>> {
    check_order(range.from, range.to)?;
    let entries = state
        .body_weight_repo
        .find_by_user(&auth_user.id, range.from, range.to)
        .await?;
    Ok(Json(entries))
}

/// Without bounds the summary covers every entry.
pub async fn summary(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Query(range): Query<RangeQuery>,
) -> Result<Json<BodyWeightSummary>> {
    check_order(range.from, range.to)?;
    let entries = state
        .body_weight_repo
        .find_by_user(&auth_user.id, range.from, range.to)
        .await?;
    Ok(Json(summarize_body_weight(&entries)))
}

pub async fn show(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BodyWeight>> {
    state
        .body_weight_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Json(input): Json<BodyWeightInput>,
) -> Result<(StatusCode, Json<BodyWeight>)> {
    let weight = validation::body_weight(input.weight)?;
    let entry = state
        .body_weight_repo
        .create(&auth_user.id, input.date, weight)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<BodyWeightInput>,
) -> Result<Json<BodyWeight>> {
    let weight = validation::body_weight(input.weight)?;
    if !state
        .body_weight_repo
        .update(&id, &auth_user.id, input.date, weight)
        .await?
    {
        return Err(not_found());
    }

    Ok(Json(BodyWeight {
        id,
        user_id: auth_user.id,
        date: input.date,
        weight,
    }))
}

pub async fn delete(
    State(state): State<BodyWeightsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.body_weight_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
