//! Realtime collection subscriptions over Server-Sent Events
//!
//! The first message of a stream is the current snapshot of the collection;
//! every later change to it (or to a collection it depends on) sends a fresh
//! snapshot. Subscribers that fall behind skip the missed notifications and
//! resynchronize with the next snapshot.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use serde_json::Value;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};

use crate::{
    error::{AppError, AppResult},
    services::{
        changes::Collection,
        realtime::{affects, snapshot, SubscriptionFilter},
    },
};

const STREAM_BUFFER: usize = 8;

fn snapshot_event(collection: Collection, data: &Value) -> SseEvent {
    SseEvent::default()
        .event("snapshot")
        .id(collection.as_str())
        .data(data.to_string())
}

/// Subscribe to a collection
#[utoipa::path(
    get,
    path = "/subscribe/{collection}",
    tag = "realtime",
    params(
        ("collection" = String, Path, description = "Collection name, e.g. members or checkouts"),
        SubscriptionFilter
    ),
    responses(
        (status = 200, description = "Event stream of snapshots", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown collection", body = crate::error::ErrorResponse)
    )
)]
pub async fn subscribe(
    State(state): State<crate::AppState>,
    Path(collection): Path<String>,
    Query(filter): Query<SubscriptionFilter>,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let collection: Collection = collection.parse().map_err(AppError::NotFound)?;

    // Subscribe before the first snapshot so no change slips in between
    let mut changes = state.services.changes.subscribe();
    let initial = snapshot(&state.services, collection, &filter).await?;

    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let services = state.services.clone();

    tokio::spawn(async move {
        tracing::debug!(collection = %collection, "Subscriber connected");
        if tx.send(snapshot_event(collection, &initial)).await.is_err() {
            return;
        }

        loop {
            let changed = tokio::select! {
                _ = tx.closed() => break,
                received = changes.recv() => received,
            };

            match changed {
                Ok(changed) if !affects(collection, changed) => continue,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(collection = %collection, skipped, "Subscriber lagged, resyncing");
                }
                Err(RecvError::Closed) => break,
            }

            let event = match snapshot(&services, collection, &filter).await {
                Ok(data) => snapshot_event(collection, &data),
                Err(e) => {
                    tracing::warn!(collection = %collection, error = %e, "Snapshot failed");
                    SseEvent::default().event("error").data(e.to_string())
                }
            };
            if tx.send(event).await.is_err() {
                break;
            }
        }
        tracing::debug!(collection = %collection, "Subscriber disconnected");
    });

    let stream = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
