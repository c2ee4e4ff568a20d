//! Check-out book API endpoints: stock items and check-outs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::inventory::{
        BulkCheckout, Checkout, CheckoutDetails, CheckoutQuery, CreateCheckout, Procure, RowError,
        StockItem, StockItemAvailability, StockSummary, UpdateCheckout, UpdateStockItem,
    },
    services::inventory::CSV_FILE_NAME,
};

/// Rejected bulk check-out
#[derive(Serialize, ToSchema)]
pub struct BulkCheckoutErrors {
    pub message: String,
    pub rows: Vec<RowError>,
}

/// List stock items with availability
#[utoipa::path(
    get,
    path = "/stock-items",
    tag = "inventory",
    responses(
        (status = 200, description = "Stock items", body = Vec<StockItemAvailability>)
    )
)]
pub async fn list_stock_items(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<StockItemAvailability>>> {
    let items = state.services.inventory.list_items().await?;
    Ok(Json(items))
}

/// Stock totals and critical items
#[utoipa::path(
    get,
    path = "/stock-items/summary",
    tag = "inventory",
    responses(
        (status = 200, description = "Stock summary", body = StockSummary)
    )
)]
pub async fn stock_summary(State(state): State<crate::AppState>) -> AppResult<Json<StockSummary>> {
    let summary = state.services.inventory.summary().await?;
    Ok(Json(summary))
}

/// Get stock item by ID
#[utoipa::path(
    get,
    path = "/stock-items/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Stock item ID")),
    responses(
        (status = 200, description = "Stock item", body = StockItemAvailability),
        (status = 404, description = "Stock item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_stock_item(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StockItemAvailability>> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(Json(item))
}

/// Procure pieces (adds to an item with the same name or creates it)
#[utoipa::path(
    post,
    path = "/stock-items",
    tag = "inventory",
    request_body = Procure,
    responses(
        (status = 200, description = "Stock item created or replenished", body = StockItem),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn procure(
    State(state): State<crate::AppState>,
    Json(data): Json<Procure>,
) -> AppResult<Json<StockItem>> {
    let item = state.services.inventory.procure(data).await?;
    Ok(Json(item))
}

/// Edit a stock item
#[utoipa::path(
    put,
    path = "/stock-items/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Stock item ID")),
    request_body = UpdateStockItem,
    responses(
        (status = 200, description = "Stock item updated", body = StockItem),
        (status = 422, description = "Total below checked out pieces", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_stock_item(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateStockItem>,
) -> AppResult<Json<StockItem>> {
    let item = state.services.inventory.update_item(id, data).await?;
    Ok(Json(item))
}

/// Delete a stock item without check-outs
#[utoipa::path(
    delete,
    path = "/stock-items/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Stock item ID")),
    responses(
        (status = 204, description = "Stock item deleted"),
        (status = 422, description = "Item still checked out", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_stock_item(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List check-outs (newest first)
#[utoipa::path(
    get,
    path = "/checkouts",
    tag = "inventory",
    params(CheckoutQuery),
    responses(
        (status = 200, description = "Check-outs", body = Vec<CheckoutDetails>)
    )
)]
pub async fn list_checkouts(
    State(state): State<crate::AppState>,
    Query(query): Query<CheckoutQuery>,
) -> AppResult<Json<Vec<CheckoutDetails>>> {
    let checkouts = state.services.inventory.list_checkouts(&query).await?;
    Ok(Json(checkouts))
}

/// Export the filtered check-out list as CSV
#[utoipa::path(
    get,
    path = "/checkouts/export",
    tag = "inventory",
    params(CheckoutQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String)
    )
)]
pub async fn export_checkouts(
    State(state): State<crate::AppState>,
    Query(query): Query<CheckoutQuery>,
) -> AppResult<Response> {
    let csv = state.services.inventory.export_csv(&query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Get check-out by ID
#[utoipa::path(
    get,
    path = "/checkouts/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Check-out ID")),
    responses(
        (status = 200, description = "Check-out", body = Checkout),
        (status = 404, description = "Check-out not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_checkout(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Checkout>> {
    let checkout = state.services.inventory.get_checkout(id).await?;
    Ok(Json(checkout))
}

/// Check out one piece to a member
#[utoipa::path(
    post,
    path = "/checkouts",
    tag = "inventory",
    request_body = CreateCheckout,
    responses(
        (status = 201, description = "Checked out", body = Checkout),
        (status = 422, description = "Nothing available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_checkout(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateCheckout>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    let checkout = state.services.inventory.checkout(data).await?;
    Ok((StatusCode::CREATED, Json(checkout)))
}

/// Edit a check-out
#[utoipa::path(
    put,
    path = "/checkouts/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Check-out ID")),
    request_body = UpdateCheckout,
    responses(
        (status = 200, description = "Check-out updated", body = Checkout),
        (status = 422, description = "Nothing available", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_checkout(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateCheckout>,
) -> AppResult<Json<Checkout>> {
    let checkout = state.services.inventory.update_checkout(id, data).await?;
    Ok(Json(checkout))
}

/// Return a piece (delete the check-out)
#[utoipa::path(
    delete,
    path = "/checkouts/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "Check-out ID")),
    responses(
        (status = 204, description = "Check-out removed")
    )
)]
pub async fn delete_checkout(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete_checkout(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check out several items to one member
#[utoipa::path(
    post,
    path = "/checkouts/bulk",
    tag = "inventory",
    request_body = BulkCheckout,
    responses(
        (status = 201, description = "Check-outs created", body = Vec<Checkout>),
        (status = 422, description = "Some rows are invalid", body = BulkCheckoutErrors)
    )
)]
pub async fn bulk_checkout(
    State(state): State<crate::AppState>,
    Json(data): Json<BulkCheckout>,
) -> AppResult<Response> {
    let response = match state.services.inventory.bulk_checkout(data).await? {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(rows) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BulkCheckoutErrors {
                message: "Fill in the required fields and check quantities".to_string(),
                rows,
            }),
        )
            .into_response(),
    };
    Ok(response)
}
