//! View-model and board row types

pub mod change;
pub mod chart;
pub mod help_request;
pub mod project;
pub mod service;

pub use change::{ChangeReport, FieldChange, ProjectChange};
pub use chart::ChartSlice;
pub use help_request::{HelpRequest, HelpRequestOrder, NewHelpRequest};
pub use project::{ProjectRecord, ProjectStats};
pub use service::{ServiceRecord, ServiceSummary};
