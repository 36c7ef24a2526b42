//! Live event stream

use crate::api::rest::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Stream registry events via SSE.
///
/// Each event carries the envelope as JSON, the event kind as the SSE event
/// name and the sequence number as the SSE id. Subscribers that fall behind
/// receive a `lagged` comment and can detect the gap from the sequence.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.registry.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        match rx.recv().await {
            Ok(envelope) => {
                let json = serde_json::to_string(&envelope).unwrap_or_default();
                let sse_event = Event::default()
                    .event(envelope.event.kind())
                    .id(envelope.sequence.to_string())
                    .data(json);
                Some((Ok(sse_event), rx))
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Event subscriber lagged");
                Some((Ok(Event::default().comment(format!("lagged {}", missed))), rx))
            }
            Err(RecvError::Closed) => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
