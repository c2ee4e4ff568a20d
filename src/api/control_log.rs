//! Control log API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::control_log::{CategoryGroup, LogEquipment, SaveLogEquipment, SaveUsageEntry},
};

/// Equipment grouped by category with statistics
#[utoipa::path(
    get,
    path = "/control-log",
    tag = "control-log",
    responses(
        (status = 200, description = "Control log overview", body = Vec<CategoryGroup>)
    )
)]
pub async fn overview(State(state): State<crate::AppState>) -> AppResult<Json<Vec<CategoryGroup>>> {
    let groups = state.services.control_log.overview().await?;
    Ok(Json(groups))
}

/// Configured category order
#[utoipa::path(
    get,
    path = "/control-log/categories",
    tag = "control-log",
    responses(
        (status = 200, description = "Categories", body = Vec<String>)
    )
)]
pub async fn categories(State(state): State<crate::AppState>) -> Json<Vec<String>> {
    Json(state.services.control_log.categories().to_vec())
}

/// Get log equipment with its entries
#[utoipa::path(
    get,
    path = "/control-log/equipment/{id}",
    tag = "control-log",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment", body = LogEquipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LogEquipment>> {
    let equipment = state.services.control_log.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Add equipment to the control log
#[utoipa::path(
    post,
    path = "/control-log/equipment",
    tag = "control-log",
    request_body = SaveLogEquipment,
    responses(
        (status = 201, description = "Equipment created", body = LogEquipment),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    Json(data): Json<SaveLogEquipment>,
) -> AppResult<(StatusCode, Json<LogEquipment>)> {
    let equipment = state.services.control_log.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Rename or move equipment
#[utoipa::path(
    put,
    path = "/control-log/equipment/{id}",
    tag = "control-log",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = SaveLogEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = LogEquipment)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<SaveLogEquipment>,
) -> AppResult<Json<LogEquipment>> {
    let equipment = state.services.control_log.update(id, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment with all of its entries
#[utoipa::path(
    delete,
    path = "/control-log/equipment/{id}",
    tag = "control-log",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.control_log.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a usage entry (newest first)
#[utoipa::path(
    post,
    path = "/control-log/equipment/{id}/entries",
    tag = "control-log",
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = SaveUsageEntry,
    responses(
        (status = 201, description = "Entry added", body = LogEquipment),
        (status = 400, description = "Date and user are required", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_entry(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<SaveUsageEntry>,
) -> AppResult<(StatusCode, Json<LogEquipment>)> {
    let equipment = state.services.control_log.add_entry(id, data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Replace a usage entry
#[utoipa::path(
    put,
    path = "/control-log/equipment/{id}/entries/{entry_id}",
    tag = "control-log",
    params(
        ("id" = Uuid, Path, description = "Equipment ID"),
        ("entry_id" = String, Path, description = "Entry ID")
    ),
    request_body = SaveUsageEntry,
    responses(
        (status = 200, description = "Entry updated", body = LogEquipment)
    )
)]
pub async fn update_entry(
    State(state): State<crate::AppState>,
    Path((id, entry_id)): Path<(Uuid, String)>,
    Json(data): Json<SaveUsageEntry>,
) -> AppResult<Json<LogEquipment>> {
    let equipment = state.services.control_log.update_entry(id, &entry_id, data).await?;
    Ok(Json(equipment))
}

/// Delete a usage entry
#[utoipa::path(
    delete,
    path = "/control-log/equipment/{id}/entries/{entry_id}",
    tag = "control-log",
    params(
        ("id" = Uuid, Path, description = "Equipment ID"),
        ("entry_id" = String, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry deleted", body = LogEquipment)
    )
)]
pub async fn delete_entry(
    State(state): State<crate::AppState>,
    Path((id, entry_id)): Path<(Uuid, String)>,
) -> AppResult<Json<LogEquipment>> {
    let equipment = state.services.control_log.delete_entry(id, &entry_id).await?;
    Ok(Json(equipment))
}
