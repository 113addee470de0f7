//! statusboard-types - Shared data types for statusboard
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types.
//!
//! Used by:
//! - statusboard-core (fetching, normalization, board store)
//! - statusboard-web (JSON API responses)
//! - statusboard (CLI tables)

pub mod models;

pub use models::{
    ChangeReport, ChartSlice, FieldChange, HelpRequest, HelpRequestOrder, NewHelpRequest,
    ProjectChange, ProjectRecord, ProjectStats, ServiceRecord, ServiceSummary,
};
