use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::check_groups;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{GroupInput, RecordFromWorkout, Workout, WorkoutInput, WorkoutRecord};
use crate::repositories::workout_record_repo::RecordFields;
use crate::repositories::{ExerciseRepository, WorkoutRecordRepository, WorkoutRepository};
use crate::validation;

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
    pub record_repo: WorkoutRecordRepository,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

fn not_found() -> AppError {
    AppError::NotFound("Workout not found".to_string())
}

pub async fn list(State(state): State<WorkoutsState>, auth_user: AuthUser) -> Result<Json<Vec<Workout>>> {
    Ok(Json(state.workout_repo.find_by_user(&auth_user.id).await?))
}

pub async fn count(State(state): State<WorkoutsState>, auth_user: AuthUser) -> Result<Json<CountResponse>> {
    let count = state.workout_repo.count_by_user(&auth_user.id).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn show(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Workout>> {
    state
        .workout_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Json(input): Json<WorkoutInput>,
) -> Result<(StatusCode, Json<Workout>)> {
    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;
    check_groups(&state.exercise_repo, &auth_user.id, &input.groups).await?;

    let workout = state
        .workout_repo
        .create(&auth_user.id, &name, description.as_deref(), input.groups)
        .await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn update(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<WorkoutInput>,
) -> Result<Json<Workout>> {
    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;
    check_groups(&state.exercise_repo, &auth_user.id, &input.groups).await?;

    if !state
        .workout_repo
        .update(&id, &auth_user.id, &name, description.as_deref(), input.groups)
        .await?
    {
        return Err(not_found());
    }

    state
        .workout_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.workout_repo.soft_delete(&id, &auth_user.id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Logs the template as performed on `date`, copying its planned sets.
pub async fn create_record(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<RecordFromWorkout>,
) -> Result<(StatusCode, Json<WorkoutRecord>)> {
    let workout = state
        .workout_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(not_found)?;

    let groups: Vec<GroupInput> = workout
        .groups
        .into_iter()
        .map(|group| GroupInput {
            exercise_id: group.exercise_id,
            sets: group.sets.into_iter().map(|set| set.values).collect(),
        })
        .collect();

    let fields = RecordFields {
        workout_id: Some(workout.id),
        date: input.date,
        duration_secs: validation::duration_secs(input.duration_secs)?,
        notes: validation::notes(input.notes.as_deref())?,
        groups,
    };

    let record = state.record_repo.create(&auth_user.id, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
