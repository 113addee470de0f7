use serde::{Deserialize, Serialize};

use super::ChartSlice;

/// Flattened project row from the projects content database
///
/// Text fields always carry a display value (`"-"` when the source property
/// is missing) so the presentation layer never branches on absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Source record id, carried through unchanged
    pub id: String,
    pub title: String,
    pub status: String,
    pub stage: String,
    pub stage_ally: String,
    pub pm: String,
    pub company: String,
    pub stakeholder: String,
    pub training: bool,
    pub genai: bool,
    pub digital_output: bool,
    pub expected_schedule: String,
    /// Link to the project document, empty when absent
    pub project_doc: String,
    pub created_at: String,
}

impl ProjectRecord {
    /// Case-insensitive match over the searchable columns
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            &self.title,
            &self.status,
            &self.pm,
            &self.company,
            &self.stage,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Stage-bucketed project counts for the overview cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total: usize,
    pub planning: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Stage distribution in fixed display order
    pub distribution: Vec<ChartSlice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, stage: &str) -> ProjectRecord {
        ProjectRecord {
            id: "id-1".to_string(),
            title: title.to_string(),
            status: "미정".to_string(),
            stage: stage.to_string(),
            stage_ally: "-".to_string(),
            pm: "Kim".to_string(),
            company: "52g".to_string(),
            stakeholder: "-".to_string(),
            training: false,
            genai: false,
            digital_output: false,
            expected_schedule: "-".to_string(),
            project_doc: String::new(),
            created_at: "-".to_string(),
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let project = record("Data Platform", "진행중");
        assert!(project.matches("data"));
        assert!(project.matches("KIM"));
        assert!(project.matches("진행"));
        assert!(!project.matches("mobile"));
    }
}
