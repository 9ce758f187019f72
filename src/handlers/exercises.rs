use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, ExerciseMuscleInput, ExerciseType, UpdateExercise};
use crate::repositories::exercise_repo::ExerciseFields;
use crate::repositories::{EquipmentRepository, ExerciseRepository, MuscleRepository};
use crate::validation;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
    pub muscle_repo: MuscleRepository,
    pub equipment_repo: EquipmentRepository,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseListQuery {
    #[serde(rename = "type")]
    pub exercise_type: Option<ExerciseType>,
}

fn not_found() -> AppError {
    AppError::NotFound("Exercise not found".to_string())
}

pub async fn list(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state
        .exercise_repo
        .find_available_for_user(&auth_user.id, query.exercise_type)
        .await?;
    Ok(Json(exercises))
}

pub async fn show(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    let exercise = find_visible(&state, &auth_user, &id).await?;
    Ok(Json(exercise))
}

pub async fn create(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Json(input): Json<CreateExercise>,
) -> Result<(StatusCode, Json<Exercise>)> {
    if input.global && !auth_user.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators can create global exercises".to_string(),
        ));
    }

    let fields = exercise_fields(
        &state,
        &input.name,
        input.description.as_deref(),
        input.exercise_type,
        input.muscles,
        input.equipment_ids,
    )
    .await?;

    let owner = (!input.global).then_some(auth_user.id.as_str());
    let exercise = state.exercise_repo.create(owner, fields).await?;
    tracing::debug!("{} created exercise {}", auth_user.username, exercise.name);

    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateExercise>,
) -> Result<Json<Exercise>> {
    find_modifiable(&state, &auth_user, &id).await?;

    let fields = exercise_fields(
        &state,
        &input.name,
        input.description.as_deref(),
        input.exercise_type,
        input.muscles,
        input.equipment_ids,
    )
    .await?;

    if !state.exercise_repo.update(&id, fields).await? {
        return Err(not_found());
    }

    state
        .exercise_repo
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    find_modifiable(&state, &auth_user, &id).await?;

    if !state.exercise_repo.delete(&id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_visible(state: &ExercisesState, auth_user: &AuthUser, id: &str) -> Result<Exercise> {
    state
        .exercise_repo
        .find_by_id(id)
        .await?
        .filter(|e| e.is_visible_to(&auth_user.id))
        .ok_or_else(not_found)
}

/// Owners may change their exercises; admins may also change global ones.
async fn find_modifiable(
    state: &ExercisesState,
    auth_user: &AuthUser,
    id: &str,
) -> Result<Exercise> {
    let exercise = find_visible(state, auth_user, id).await?;

    let allowed = match exercise.user_id.as_deref() {
        Some(owner) => owner == auth_user.id,
        None => auth_user.is_admin(),
    };
    if !allowed {
        return Err(AppError::Forbidden(
            "Only administrators can change global exercises".to_string(),
        ));
    }

    Ok(exercise)
}

async fn exercise_fields(
    state: &ExercisesState,
    name: &str,
    description: Option<&str>,
    exercise_type: ExerciseType,
    muscles: Vec<ExerciseMuscleInput>,
    equipment_ids: Vec<String>,
) -> Result<ExerciseFields> {
    let name = validation::name("Name", name)?;
    let description = validation::description(description)?;

    let muscle_ids: Vec<String> = muscles.iter().map(|m| m.muscle_id.clone()).collect();
    if let Some(missing) = state.muscle_repo.find_missing(&muscle_ids).await?.first() {
        return Err(AppError::NotFound(format!("Muscle {} not found", missing)));
    }
    if let Some(missing) = state.equipment_repo.find_missing(&equipment_ids).await?.first() {
        return Err(AppError::NotFound(format!("Equipment {} not found", missing)));
    }

    Ok(ExerciseFields {
        name,
        description,
        exercise_type,
        muscles,
        equipment_ids,
    })
}
