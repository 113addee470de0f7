//! statusboard-core - Core library for statusboard
//!
//! Mirrors Notion databases and a Supabase table into dashboard view records:
//! a short-TTL response cache, a retrying Notion client, the property
//! normalizer and the community help board.

pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod normalize;
pub mod notion;
pub mod store;
pub mod views;

pub use board::{HelpBoard, MemoryStore, PostStore, SupabaseStore};
pub use cache::{CacheOptions, Clock, ManualClock, ResponseCache, SystemClock};
pub use config::{DashboardConfig, NotionConfig, SupabaseConfig};
pub use error::{BoardError, CoreError, DegradedState, NotionError};
pub use event::{BoardEvent, EventBus};
pub use notion::{
    DatabaseSchema, ExternalRecord, NotionClient, NotionSource, QueryResponse, SchemaReport,
};
pub use store::{DashboardStore, FetchStatus, ProjectsPage, ServicesPage};
