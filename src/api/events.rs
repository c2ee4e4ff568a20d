//! Events API endpoints (interventions, exercises, meetings)

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::event::{CreateEvent, Event, EventQuery, SetParticipation, UpdateEvent},
};

/// List events (most recent first)
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events list", body = Vec<Event>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let events = state.services.events.list(&query).await?;
    Ok(Json(events))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.get_by_id(id).await?;
    Ok(Json(event))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = state.services.events.create(data).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event)
    )
)]
pub async fn update_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.update(id, data).await?;
    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted")
    )
)]
pub async fn delete_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Save per-member participation minutes
#[utoipa::path(
    put,
    path = "/events/{id}/participation",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = SetParticipation,
    responses(
        (status = 200, description = "Participation saved", body = Event)
    )
)]
pub async fn set_participation(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<SetParticipation>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.set_participation(id, &data.entries).await?;
    Ok(Json(event))
}

/// Give every linked member the full event duration
#[utoipa::path(
    post,
    path = "/events/{id}/participation/fill",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Participation filled", body = Event),
        (status = 422, description = "Event has no duration", body = crate::error::ErrorResponse)
    )
)]
pub async fn fill_participation(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.fill_participation(id).await?;
    Ok(Json(event))
}

/// Printable HTML report of an event
#[utoipa::path(
    get,
    path = "/events/{id}/report",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "HTML report", content_type = "text/html", body = String)
    )
)]
pub async fn event_report(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let report = state.services.events.report(id).await?;
    let disposition = format!("inline; filename=\"{}\"", report.file_name.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.html,
    )
        .into_response())
}
