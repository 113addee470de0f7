use serde::{Deserialize, Serialize};

use super::ChartSlice;

/// Flattened row from the services (digital product) content database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub title: String,
    pub status: String,
    pub company: String,
    /// Product owner
    pub po: String,
    /// Software / platform column
    pub sw: String,
    /// Who built the service ("미지정" when unknown)
    pub make: String,
    pub service_url: String,
}

/// Chart-ready aggregation of the services database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub total_count: usize,
    /// Services with a product owner assigned
    pub assigned_count: usize,
    pub status_data: Vec<ChartSlice>,
    pub po_data: Vec<ChartSlice>,
    pub sw_data: Vec<ChartSlice>,
    pub make_data: Vec<ChartSlice>,
}
