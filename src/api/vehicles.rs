//! Vehicles API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
};

/// List vehicles (by plate)
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "Vehicles list", body = Vec<Vehicle>)
    )
)]
pub async fn list_vehicles(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = state.services.vehicles.list().await?;
    Ok(Json(vehicles))
}

/// Get vehicle by ID
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_vehicle(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = state.services.vehicles.get_by_id(id).await?;
    Ok(Json(vehicle))
}

/// Create a vehicle
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    request_body = CreateVehicle,
    responses(
        (status = 201, description = "Vehicle created", body = Vehicle),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_vehicle(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = state.services.vehicles.create(data).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Update a vehicle
#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    request_body = UpdateVehicle,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_vehicle(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = state.services.vehicles.update(id, data).await?;
    Ok(Json(vehicle))
}

/// Delete a vehicle
#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_vehicle(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.vehicles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
