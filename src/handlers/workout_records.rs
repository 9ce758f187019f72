use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{check_groups, check_order};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Page, PageQuery, WorkoutRecord, WorkoutRecordInput};
use crate::repositories::workout_record_repo::RecordFields;
use crate::repositories::{ExerciseRepository, WorkoutRecordRepository, WorkoutRepository};
use crate::validation;

#[derive(Clone)]
pub struct WorkoutRecordsState {
    pub record_repo: WorkoutRecordRepository,
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout record not found".to_string())
}

pub async fn list(
    State(state): State<WorkoutRecordsState>,
    auth_user: AuthUser,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<Page<WorkoutRecord>>> {
    check_order(query.from, query.to)?;
    let paging = PageQuery {
        page: query.page,
        per_page: query.per_page,
    };

    let total = state
        .record_repo
        .count_by_user(&auth_user.id, query.from, query.to)
        .await?;
    let records = state
        .record_repo
        .find_by_user_paginated(
            &auth_user.id,
            query.from,
            query.to,
            paging.per_page(),
            paging.offset(),
        )
        .await?;

    Ok(Json(Page::new(records, &paging, total)))
}

pub async fn show(
    State(state): State<WorkoutRecordsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutRecord>> {
    state
        .record_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<WorkoutRecordsState>,
    auth_user: AuthUser,
    Json(input): Json<WorkoutRecordInput>,
) -> Result<(StatusCode, Json<WorkoutRecord>)> {
    let fields = record_fields(&state, &auth_user, input).await?;
    let record = state.record_repo.create(&auth_user.id, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<WorkoutRecordsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<WorkoutRecordInput>,
) -> Result<Json<WorkoutRecord>> {
    let fields = record_fields(&state, &auth_user, input).await?;

    if !state.record_repo.update(&id, &auth_user.id, fields).await? {
        return Err(not_found());
    }

    state
        .record_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete(
    State(state): State<WorkoutRecordsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.record_repo.delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn record_fields(
    state: &WorkoutRecordsState,
    auth_user: &AuthUser,
    input: WorkoutRecordInput,
) -> Result<RecordFields> {
    let workout_id = match input.workout_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(workout_id) => {
            let workout = state
                .workout_repo
                .find_by_id(workout_id, &auth_user.id)
                .await?
                .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
            Some(workout.id)
        }
    };

    let duration_secs = validation::duration_secs(input.duration_secs)?;
    let notes = validation::notes(input.notes.as_deref())?;
    check_groups(&state.exercise_repo, &auth_user.id, &input.groups).await?;

    Ok(RecordFields {
        workout_id,
        date: input.date,
        duration_secs,
        notes,
        groups: input.groups,
    })
}
