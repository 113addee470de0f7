//! Caching layer for statusboard-core
//!
//! Provides the short-TTL response cache that sits in front of the Notion API.

pub mod clock;
pub mod response_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use response_cache::{CacheEntry, CacheOptions, ResponseCache};
