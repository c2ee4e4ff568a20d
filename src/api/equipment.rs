//! Equipment catalog API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        activity::BackfillResult,
        equipment::{CreateEquipment, EnsuredRecord, Equipment, RenameEquipment},
    },
};

/// List equipment (by name)
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Create equipment unless a record with the same normalized name exists
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = EnsuredRecord),
        (status = 200, description = "Existing equipment returned", body = EnsuredRecord),
        (status = 400, description = "Empty name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<EnsuredRecord>)> {
    let record = state.services.equipment.create_if_not_exists(&data.name).await?;
    let status = if record.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(record)))
}

/// Rename equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = RenameEquipment,
    responses(
        (status = 200, description = "Equipment renamed", body = Equipment),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn rename_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<RenameEquipment>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.rename(id, &data.name).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute missing or stale name keys
#[utoipa::path(
    post,
    path = "/equipment/backfill-keys",
    tag = "equipment",
    responses(
        (status = 200, description = "Keys updated", body = BackfillResult)
    )
)]
pub async fn backfill_equipment_keys(State(state): State<crate::AppState>) -> AppResult<Json<BackfillResult>> {
    let result = state.services.equipment.backfill_name_keys().await?;
    Ok(Json(result))
}
