//! Event bus for statusboard using tokio::broadcast
//!
//! The web layer forwards these to browsers over SSE so open boards and
//! dashboards refresh without polling.

use serde::Serialize;
use tokio::sync::broadcast;

/// Events emitted by the board and the Notion source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A help request was posted
    RequestAdded { id: String },
    /// A help request received a like
    RequestLiked { id: String, likes: u32 },
    /// A Notion database was re-fetched with `force_refresh`
    DataRefreshed { database: String, changes: usize },
}

impl BoardEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::RequestAdded { .. } => "help-request-added",
            BoardEvent::RequestLiked { .. } => "help-request-liked",
            BoardEvent::DataRefreshed { .. } => "data-refreshed",
        }
    }
}

/// Event bus for broadcasting board events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BoardEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: BoardEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(BoardEvent::RequestAdded {
            id: "r1".to_string(),
        });
        bus.publish(BoardEvent::RequestLiked {
            id: "r1".to_string(),
            likes: 2,
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, BoardEvent::RequestAdded { ref id } if id == "r1"));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.name(), "help-request-liked");
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(BoardEvent::DataRefreshed {
            database: "db".to_string(),
            changes: 0,
        });

        assert_eq!(rx1.recv().await.unwrap(), rx2.recv().await.unwrap());
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        bus.publish(BoardEvent::RequestAdded { id: "x".to_string() });
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(BoardEvent::RequestLiked {
            id: "r1".to_string(),
            likes: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "request_liked");
        assert_eq!(json["likes"], 3);
    }
}
