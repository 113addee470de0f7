//! Server-Sent Events for live board updates

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use statusboard_core::{BoardEvent, EventBus};
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

/// Build one SSE frame; the event name doubles as the browser listener key
pub fn to_sse_event(event: &BoardEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.name()).data(data)
}

/// Create an SSE stream from the event bus
///
/// Lagged receivers skip the dropped events instead of closing the stream.
pub fn create_sse_stream(
    event_bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(event_bus.subscribe());

    let sse_stream = stream.filter_map(|result| match result {
        Ok(event) => Some(Ok(to_sse_event(&event))),
        Err(e) => {
            warn!(error = %e, "SSE subscriber lagged");
            None
        }
    });

    Sse::new(sse_stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_forwards_published_events() {
        let bus = EventBus::default_capacity();
        let stream = BroadcastStream::new(bus.subscribe());
        bus.publish(BoardEvent::RequestLiked {
            id: "r1".to_string(),
            likes: 2,
        });

        let mut events = stream.filter_map(Result::ok);
        let received = events.next().await.unwrap();
        assert_eq!(received.name(), "help-request-liked");

        let json = serde_json::to_value(&received).unwrap();
        assert_eq!(json["type"], "request_liked");
        assert_eq!(json["likes"], 2);
    }
}
