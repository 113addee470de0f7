use serde::{Deserialize, Serialize};

use super::ProjectRecord;

/// One field that differs between two snapshots of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    /// Korean column label shown in the change report
    pub label: String,
    pub old_value: String,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectChange {
    pub item: ProjectRecord,
    pub changes: Vec<FieldChange>,
}

/// Difference between the project list before and after a refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub added: Vec<ProjectRecord>,
    pub removed: Vec<ProjectRecord>,
    pub modified: Vec<ProjectChange>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}
