//! Persistence seam for the help board

use crate::cache::{Clock, SystemClock};
use crate::error::BoardError;
use async_trait::async_trait;
use parking_lot::RwLock;
use statusboard_types::{HelpRequest, HelpRequestOrder, NewHelpRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Storage adapter for help requests
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list(&self, order: HelpRequestOrder) -> Result<Vec<HelpRequest>, BoardError>;

    async fn get(&self, id: &str) -> Result<Option<HelpRequest>, BoardError>;

    /// Insert and return the stored row with its assigned id and timestamp
    async fn insert(&self, request: NewHelpRequest) -> Result<HelpRequest, BoardError>;

    async fn set_likes(&self, id: &str, likes: u32) -> Result<HelpRequest, BoardError>;

    async fn count(&self) -> Result<usize, BoardError>;

    /// Every id, oldest first
    async fn ids_by_created_asc(&self) -> Result<Vec<String>, BoardError>;

    /// Backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}

/// Sort in place the way the board lists requests
pub fn sort_requests(requests: &mut [HelpRequest], order: HelpRequestOrder) {
    match order {
        HelpRequestOrder::Latest => requests.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        HelpRequestOrder::Oldest => requests.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        HelpRequestOrder::Popular => requests.sort_by(|a, b| {
            b.likes
                .cmp(&a.likes)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

/// In-process store used when Supabase is not configured, and in tests
#[derive(Debug)]
pub struct MemoryStore {
    rows: RwLock<Vec<HelpRequest>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            clock,
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, order: HelpRequestOrder) -> Result<Vec<HelpRequest>, BoardError> {
        let mut rows = self.rows.read().clone();
        sort_requests(&mut rows, order);
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<HelpRequest>, BoardError> {
        Ok(self.rows.read().iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, request: NewHelpRequest) -> Result<HelpRequest, BoardError> {
        let row = HelpRequest {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            content: request.content,
            emoji: request.emoji,
            author: request.author,
            created_at: self.clock.now(),
            views: request.views,
            likes: request.likes,
        };
        self.rows.write().push(row.clone());
        Ok(row)
    }

    async fn set_likes(&self, id: &str, likes: u32) -> Result<HelpRequest, BoardError> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BoardError::NotFound { id: id.to_string() })?;
        row.likes = likes;
        Ok(row.clone())
    }

    async fn count(&self) -> Result<usize, BoardError> {
        Ok(self.rows.read().len())
    }

    async fn ids_by_created_asc(&self) -> Result<Vec<String>, BoardError> {
        let mut rows = self.rows.read().clone();
        sort_requests(&mut rows, HelpRequestOrder::Oldest);
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
