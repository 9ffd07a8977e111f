//! Server-Sent Events stream of "data changed" notifications

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{services::notifier::Collection, AppState};

fn event_name(collection: Collection) -> &'static str {
    match collection {
        Collection::Authors => "authors:updated",
        Collection::Books => "books:updated",
        Collection::Reviews => "reviews:updated",
    }
}

/// Subscribe to change notifications
///
/// Each event is named after the collection that changed
/// (`authors:updated`, `books:updated`, `reviews:updated`) and carries the
/// change as JSON. Events published before subscribing are not replayed.
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses(
        (status = 200, description = "text/event-stream of change events", body = crate::services::notifier::ChangeEvent, content_type = "text/event-stream")
    )
)]
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.services.notifier.subscribe();
    tracing::info!(
        "Event subscriber connected, total: {}",
        state.services.notifier.subscriber_count()
    );

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(change) => Event::default()
            .event(event_name(change.collection))
            .json_data(&change)
            .ok()
            .map(Ok),
        Err(e) => {
            tracing::warn!("Event subscriber lagging: {}", e);
            None
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
