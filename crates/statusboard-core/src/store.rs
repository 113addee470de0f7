//! Dashboard store: the one object the web layer and CLI talk to
//!
//! Owns the Notion source (and its response cache), the help board and the
//! event bus. Construct once at startup and share through `Arc`.

use crate::board::{HelpBoard, MemoryStore, PostStore, SupabaseStore};
use crate::cache::{Clock, SystemClock};
use crate::config::DashboardConfig;
use crate::error::{CoreError, DegradedState};
use crate::event::{BoardEvent, EventBus};
use crate::notion::{NotionSource, QueryResponse};
use crate::views;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use statusboard_types::{ChangeReport, ProjectRecord, ProjectStats, ServiceRecord, ServiceSummary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetch outcome shared by every page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub use_mock_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl FetchStatus {
    fn from_response(response: &QueryResponse) -> Self {
        Self {
            error: response.error.clone(),
            status_code: response.status_code,
            use_mock_data: response.use_mock_data,
            last_updated: response.timestamp,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectsPage {
    #[serde(flatten)]
    pub status: FetchStatus,
    pub projects: Vec<ProjectRecord>,
    pub stats: ProjectStats,
    /// Present after a forced refresh when an earlier snapshot exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServicesPage {
    #[serde(flatten)]
    pub status: FetchStatus,
    pub services: Vec<ServiceRecord>,
    pub summary: ServiceSummary,
}

pub struct DashboardStore {
    config: DashboardConfig,
    notion: NotionSource,
    board: HelpBoard,
    event_bus: EventBus,
    degraded_state: RwLock<DegradedState>,
    /// Last successful project list, for change reports
    last_projects: RwLock<Option<Vec<ProjectRecord>>>,
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("notion", &self.notion)
            .field("board", &self.board)
            .field("degraded_state", &*self.degraded_state.read())
            .finish_non_exhaustive()
    }
}

impl DashboardStore {
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Store whose caches and board timestamps follow `clock`
    pub fn with_clock(config: DashboardConfig, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        let event_bus = EventBus::new(config.event_capacity);
        let notion = NotionSource::with_clock(config.notion.clone(), clock.clone())?;

        let post_store: Arc<dyn PostStore> = if config.supabase.is_configured() {
            Arc::new(SupabaseStore::new(&config.supabase)?)
        } else {
            warn!(
                missing = %config.supabase.missing().join(", "),
                "Supabase is not configured, help board is kept in memory"
            );
            Arc::new(MemoryStore::with_clock(clock))
        };

        Ok(Self::from_parts(config, notion, post_store, event_bus))
    }

    /// Assemble from pre-built parts
    pub fn from_parts(
        config: DashboardConfig,
        notion: NotionSource,
        post_store: Arc<dyn PostStore>,
        event_bus: EventBus,
    ) -> Self {
        let degraded = DegradedState::from_missing(config.missing_vars());
        if let DegradedState::PartialData { reason, .. } = &degraded {
            warn!(%reason, "Dashboard starting with incomplete configuration");
        }

        info!(
            notion_configured = notion.is_configured(),
            board_backend = post_store.backend(),
            "Dashboard store ready"
        );

        Self {
            board: HelpBoard::new(post_store, event_bus.clone()),
            config,
            notion,
            event_bus,
            degraded_state: RwLock::new(degraded),
            last_projects: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn notion(&self) -> &NotionSource {
        &self.notion
    }

    pub fn board(&self) -> &HelpBoard {
        &self.board
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn degraded_state(&self) -> DegradedState {
        self.degraded_state.read().clone()
    }

    /// Project rows, stage stats and, on refresh, what changed
    pub async fn projects(&self, force_refresh: bool) -> ProjectsPage {
        let response = self.notion.fetch_projects(force_refresh).await;
        let status = FetchStatus::from_response(&response);
        if status.is_error() {
            return ProjectsPage {
                status,
                ..ProjectsPage::default()
            };
        }

        let projects = views::projects(&response);
        let stats = views::project_stats(&projects);
        debug!(count = projects.len(), "Projects normalized");

        let previous = self.last_projects.write().replace(projects.clone());
        let changes = match previous {
            Some(previous) if force_refresh => {
                let report = views::diff_projects(&previous, &projects);
                info!(
                    added = report.added.len(),
                    removed = report.removed.len(),
                    modified = report.modified.len(),
                    "Projects refreshed"
                );
                self.event_bus.publish(BoardEvent::DataRefreshed {
                    database: "projects".to_string(),
                    changes: report.total(),
                });
                Some(report)
            }
            _ => None,
        };

        ProjectsPage {
            status,
            projects,
            stats,
            changes,
        }
    }

    pub async fn services(&self, force_refresh: bool) -> ServicesPage {
        let response = self.notion.fetch_services(force_refresh).await;
        let status = FetchStatus::from_response(&response);
        if status.is_error() {
            return ServicesPage {
                status,
                ..ServicesPage::default()
            };
        }

        let services = views::services(&response);
        let summary = views::service_summary(&services);
        if force_refresh {
            self.event_bus.publish(BoardEvent::DataRefreshed {
                database: "services".to_string(),
                changes: services.len(),
            });
        }

        ServicesPage {
            status,
            services,
            summary,
        }
    }
}
