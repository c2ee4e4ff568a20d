//! Activity taxonomy API endpoints (categories and activities)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        activity::{
            Activity, ActivityCategory, ActivityQuery, BackfillResult, BulkCreateActivities,
            BulkCreateResult, CategoryName, CreateActivity, RenameActivity,
        },
        equipment::EnsuredRecord,
    },
};

/// List activity categories
#[utoipa::path(
    get,
    path = "/activity-categories",
    tag = "activities",
    responses(
        (status = 200, description = "Categories", body = Vec<ActivityCategory>)
    )
)]
pub async fn list_categories(State(state): State<crate::AppState>) -> AppResult<Json<Vec<ActivityCategory>>> {
    let categories = state.services.activities.list_categories().await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/activity-categories",
    tag = "activities",
    request_body = CategoryName,
    responses(
        (status = 201, description = "Category created", body = ActivityCategory),
        (status = 409, description = "Category already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    Json(data): Json<CategoryName>,
) -> AppResult<(StatusCode, Json<ActivityCategory>)> {
    let category = state.services.activities.create_category(&data.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/activity-categories/{id}",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryName,
    responses(
        (status = 200, description = "Category renamed", body = ActivityCategory),
        (status = 409, description = "Category already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn rename_category(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CategoryName>,
) -> AppResult<Json<ActivityCategory>> {
    let category = state.services.activities.rename_category(id, &data.name).await?;
    Ok(Json(category))
}

/// Delete a category and all of its activities
#[utoipa::path(
    delete,
    path = "/activity-categories/{id}",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.activities.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add several activities to a category
#[utoipa::path(
    post,
    path = "/activity-categories/{id}/activities",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = BulkCreateActivities,
    responses(
        (status = 200, description = "Created and skipped names", body = BulkCreateResult)
    )
)]
pub async fn bulk_create_activities(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<BulkCreateActivities>,
) -> AppResult<Json<BulkCreateResult>> {
    let result = state
        .services
        .activities
        .bulk_create_in_category(id, &data.names)
        .await?;
    Ok(Json(result))
}

/// List activities
#[utoipa::path(
    get,
    path = "/activities",
    tag = "activities",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activities", body = Vec<Activity>)
    )
)]
pub async fn list_activities(
    State(state): State<crate::AppState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<Activity>>> {
    let activities = state.services.activities.list(query.category_id).await?;
    Ok(Json(activities))
}

/// Get activity by ID
#[utoipa::path(
    get,
    path = "/activities/{id}",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Activity", body = Activity),
        (status = 404, description = "Activity not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_activity(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Activity>> {
    let activity = state.services.activities.get_by_id(id).await?;
    Ok(Json(activity))
}

/// Create an activity unless one with the same normalized name exists
/// (inside `category_id` when given, globally otherwise)
#[utoipa::path(
    post,
    path = "/activities",
    tag = "activities",
    request_body = CreateActivity,
    responses(
        (status = 201, description = "Activity created", body = EnsuredRecord),
        (status = 200, description = "Existing activity returned", body = EnsuredRecord)
    )
)]
pub async fn create_activity(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateActivity>,
) -> AppResult<(StatusCode, Json<EnsuredRecord>)> {
    let record = match data.category_id {
        Some(category_id) => {
            state
                .services
                .activities
                .create_in_category(category_id, &data.name)
                .await?
        }
        None => state.services.activities.create_if_not_exists(&data.name).await?,
    };
    let status = if record.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(record)))
}

/// Rename an activity within a category
#[utoipa::path(
    put,
    path = "/activities/{id}",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Activity ID")),
    request_body = RenameActivity,
    responses(
        (status = 200, description = "Activity renamed", body = Activity),
        (status = 409, description = "Name already used in the category", body = crate::error::ErrorResponse)
    )
)]
pub async fn rename_activity(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<RenameActivity>,
) -> AppResult<Json<Activity>> {
    let activity = state
        .services
        .activities
        .rename_in_category(id, data.category_id, &data.name)
        .await?;
    Ok(Json(activity))
}

/// Delete an activity
#[utoipa::path(
    delete,
    path = "/activities/{id}",
    tag = "activities",
    params(("id" = Uuid, Path, description = "Activity ID")),
    responses(
        (status = 204, description = "Activity deleted")
    )
)]
pub async fn delete_activity(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.activities.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute missing or stale name keys of categories and activities
#[utoipa::path(
    post,
    path = "/activities/backfill-keys",
    tag = "activities",
    responses(
        (status = 200, description = "Keys updated", body = BackfillResult)
    )
)]
pub async fn backfill_activity_keys(State(state): State<crate::AppState>) -> AppResult<Json<BackfillResult>> {
    let result = state.services.activities.backfill_name_keys().await?;
    Ok(Json(result))
}
