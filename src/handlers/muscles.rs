use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{Muscle, MuscleInput, MuscleWithChildren};
use crate::repositories::MuscleRepository;
use crate::validation;

#[derive(Clone)]
pub struct MusclesState {
    pub muscle_repo: MuscleRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Muscle not found".to_string())
}

pub async fn list(State(state): State<MusclesState>, _user: AuthUser) -> Result<Json<Vec<Muscle>>> {
    Ok(Json(state.muscle_repo.find_all().await?))
}

pub async fn show(
    State(state): State<MusclesState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MuscleWithChildren>> {
    let muscle = state.muscle_repo.find_by_id(&id).await?.ok_or_else(not_found)?;
    let children = state.muscle_repo.find_children(&id).await?;
    Ok(Json(MuscleWithChildren { muscle, children }))
}

pub async fn show_by_name(
    State(state): State<MusclesState>,
    _user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Muscle>> {
    state
        .muscle_repo
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn children(
    State(state): State<MusclesState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Muscle>>> {
    state.muscle_repo.find_by_id(&id).await?.ok_or_else(not_found)?;
    Ok(Json(state.muscle_repo.find_children(&id).await?))
}

pub async fn create(
    State(state): State<MusclesState>,
    _admin: AdminUser,
    Json(input): Json<MuscleInput>,
) -> Result<(StatusCode, Json<Muscle>)> {
    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;
    let parent_id = check_parent(&state.muscle_repo, None, input.parent_id.as_deref()).await?;

    let muscle = state
        .muscle_repo
        .create(&name, description.as_deref(), parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(muscle)))
}

pub async fn update(
    State(state): State<MusclesState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<MuscleInput>,
) -> Result<Json<Muscle>> {
    state.muscle_repo.find_by_id(&id).await?.ok_or_else(not_found)?;

    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;
    let parent_id = check_parent(&state.muscle_repo, Some(id.as_str()), input.parent_id.as_deref()).await?;

    if !state
        .muscle_repo
        .update(&id, &name, description.as_deref(), parent_id)
        .await?
    {
        return Err(not_found());
    }

    state
        .muscle_repo
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn delete(
    State(state): State<MusclesState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.muscle_repo.delete(&id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The parent must exist and must not be `id` or one of its descendants.
async fn check_parent<'a>(
    repo: &MuscleRepository,
    id: Option<&str>,
    parent_id: Option<&'a str>,
) -> Result<Option<&'a str>> {
    let Some(parent_id) = parent_id.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    repo.find_by_id(parent_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parent muscle not found".to_string()))?;

    if let Some(id) = id {
        let lineage = repo.find_lineage(parent_id).await?;
        if lineage.iter().any(|ancestor| ancestor == id) {
            return Err(AppError::BadRequest(
                "A muscle cannot be its own ancestor".to_string(),
            ));
        }
    }

    Ok(Some(parent_id))
}
