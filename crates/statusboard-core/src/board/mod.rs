//! Community help board: anonymous short notes with likes

mod emoji;
mod service;
mod store;
mod supabase;

pub use emoji::{emoji_for_content, DEFAULT_EMOJI, EMOJI_KEYWORDS};
pub use service::{HelpBoard, ANONYMOUS_AUTHOR};
pub use store::{sort_requests, MemoryStore, PostStore};
pub use supabase::{parse_content_range_total, SupabaseStore};
