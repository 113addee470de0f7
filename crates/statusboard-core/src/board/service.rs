//! Help board operations on top of a [`PostStore`]

use super::emoji::emoji_for_content;
use super::store::PostStore;
use crate::error::BoardError;
use crate::event::{BoardEvent, EventBus};
use statusboard_types::{HelpRequest, HelpRequestOrder, NewHelpRequest};
use std::sync::Arc;
use tracing::{info, warn};

/// Author recorded for every post; the board is anonymous
pub const ANONYMOUS_AUTHOR: &str = "익명";

#[derive(Clone)]
pub struct HelpBoard {
    store: Arc<dyn PostStore>,
    events: EventBus,
}

impl std::fmt::Debug for HelpBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpBoard")
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

impl HelpBoard {
    pub fn new(store: Arc<dyn PostStore>, events: EventBus) -> Self {
        Self { store, events }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Post a new anonymous request; blank content is rejected
    pub async fn submit(&self, content: &str) -> Result<HelpRequest, BoardError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BoardError::EmptyContent);
        }

        let request = NewHelpRequest {
            content: content.to_string(),
            emoji: emoji_for_content(content).to_string(),
            author: ANONYMOUS_AUTHOR.to_string(),
            views: 0,
            likes: 0,
        };

        let stored = self.store.insert(request).await?;
        info!(id = %stored.id, emoji = %stored.emoji, "Help request posted");
        self.events.publish(BoardEvent::RequestAdded {
            id: stored.id.clone(),
        });
        Ok(stored)
    }

    /// Add one like and return the updated row
    pub async fn like(&self, id: &str) -> Result<HelpRequest, BoardError> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| BoardError::NotFound { id: id.to_string() })?;

        let updated = self
            .store
            .set_likes(id, current.likes.saturating_add(1))
            .await?;
        self.events.publish(BoardEvent::RequestLiked {
            id: updated.id.clone(),
            likes: updated.likes,
        });
        Ok(updated)
    }

    pub async fn list(&self, order: HelpRequestOrder) -> Result<Vec<HelpRequest>, BoardError> {
        self.store.list(order).await
    }

    /// Number of posts; store failures count as zero
    pub async fn count(&self) -> usize {
        match self.store.count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to count help requests");
                0
            }
        }
    }

    /// 1-based position of `id` among all posts, oldest first
    ///
    /// `None` when the id is unknown or the store fails.
    pub async fn order_of(&self, id: &str) -> Option<usize> {
        match self.store.ids_by_created_asc().await {
            Ok(ids) => ids.iter().position(|candidate| candidate == id).map(|i| i + 1),
            Err(e) => {
                warn!(id, error = %e, "Failed to compute help request order");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MemoryStore;
    use crate::cache::ManualClock;
    use async_trait::async_trait;
    use std::time::Duration;

    fn board() -> (HelpBoard, Arc<ManualClock>, EventBus) {
        let clock = Arc::new(ManualClock::starting_now());
        let events = EventBus::default_capacity();
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        (HelpBoard::new(store, events.clone()), clock, events)
    }

    #[tokio::test]
    async fn test_submit_assigns_defaults_and_publishes() {
        let (board, _clock, events) = board();
        let mut rx = events.subscribe();

        let posted = board.submit("  서버 배포가 안돼요  ").await.unwrap();
        assert_eq!(posted.content, "서버 배포가 안돼요");
        assert_eq!(posted.emoji, "🖧");
        assert_eq!(posted.author, ANONYMOUS_AUTHOR);
        assert_eq!(posted.views, 0);
        assert_eq!(posted.likes, 0);

        assert_eq!(
            rx.recv().await.unwrap(),
            BoardEvent::RequestAdded { id: posted.id }
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_content() {
        let (board, _clock, _events) = board();
        assert!(matches!(
            board.submit("   \n").await,
            Err(BoardError::EmptyContent)
        ));
        assert_eq!(board.count().await, 0);
    }

    #[tokio::test]
    async fn test_like_increments() {
        let (board, _clock, _events) = board();
        let posted = board.submit("질문 있어요").await.unwrap();

        board.like(&posted.id).await.unwrap();
        let liked = board.like(&posted.id).await.unwrap();
        assert_eq!(liked.likes, 2);

        assert!(matches!(
            board.like("missing").await,
            Err(BoardError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_order_of_is_one_based_by_creation() {
        let (board, clock, _events) = board();
        let a = board.submit("a").await.unwrap();
        clock.advance(Duration::from_secs(1));
        let b = board.submit("b").await.unwrap();

        assert_eq!(board.order_of(&a.id).await, Some(1));
        assert_eq!(board.order_of(&b.id).await, Some(2));
        assert_eq!(board.order_of("nope").await, None);
        assert_eq!(board.count().await, 2);
    }

    struct FailingStore;

    #[async_trait]
    impl PostStore for FailingStore {
        async fn list(&self, _: HelpRequestOrder) -> Result<Vec<HelpRequest>, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        async fn get(&self, _: &str) -> Result<Option<HelpRequest>, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        async fn insert(&self, _: NewHelpRequest) -> Result<HelpRequest, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        async fn set_likes(&self, _: &str, _: u32) -> Result<HelpRequest, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        async fn count(&self) -> Result<usize, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        async fn ids_by_created_asc(&self) -> Result<Vec<String>, BoardError> {
            Err(BoardError::InvalidResponse { message: "down".into() })
        }
        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_store_failures_degrade() {
        let board = HelpBoard::new(Arc::new(FailingStore), EventBus::default_capacity());
        assert_eq!(board.count().await, 0);
        assert_eq!(board.order_of("x").await, None);
        assert!(board.list(HelpRequestOrder::Latest).await.is_err());
    }
}
