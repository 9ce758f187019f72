use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{Equipment, EquipmentInput};
use crate::repositories::EquipmentRepository;
use crate::validation;

#[derive(Clone)]
pub struct EquipmentState {
    pub equipment_repo: EquipmentRepository,
}

fn not_found() -> AppError {
    AppError::NotFound("Equipment not found".to_string())
}

pub async fn list(
    State(state): State<EquipmentState>,
    _user: AuthUser,
) -> Result<Json<Vec<Equipment>>> {
    Ok(Json(state.equipment_repo.find_all().await?))
}

pub async fn show(
    State(state): State<EquipmentState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Equipment>> {
    state
        .equipment_repo
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn show_by_name(
    State(state): State<EquipmentState>,
    _user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Equipment>> {
    state
        .equipment_repo
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create(
    State(state): State<EquipmentState>,
    _admin: AdminUser,
    Json(input): Json<EquipmentInput>,
) -> Result<(StatusCode, Json<Equipment>)> {
    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;

    let equipment = state
        .equipment_repo
        .create(&name, description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn update(
    State(state): State<EquipmentState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<EquipmentInput>,
) -> Result<Json<Equipment>> {
    let name = validation::name("Name", &input.name)?;
    let description = validation::description(input.description.as_deref())?;

    if !state
        .equipment_repo
        .update(&id, &name, description.as_deref())
        .await?
    {
        return Err(not_found());
    }

    Ok(Json(Equipment {
        id,
        name,
        description,
    }))
}

pub async fn delete(
    State(state): State<EquipmentState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.equipment_repo.delete(&id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
