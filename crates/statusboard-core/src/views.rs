//! View assembly: raw records → display rows and chart summaries

use crate::normalize::{format_date, format_date_range};
use crate::notion::{ExternalRecord, QueryResponse};
use statusboard_types::{
    ChangeReport, ChartSlice, FieldChange, ProjectChange, ProjectRecord, ProjectStats,
    ServiceRecord, ServiceSummary,
};
use std::collections::{BTreeMap, HashMap};

/// Placeholder for missing text columns
pub const EMPTY: &str = "-";
pub const UNTITLED: &str = "제목 없음";
pub const UNDECIDED: &str = "미정";
pub const UNASSIGNED_MAKE: &str = "미지정";

pub const STAGE_PLANNING: &str = "진행보류/후보/확정";
pub const STAGE_IN_PROGRESS: &str = "진행중";
pub const STAGE_COMPLETED: &str = "진행완료";

const PLANNING_MARKERS: &[&str] = &["진행보류", "진행후보", "진행확정", "할 일"];
const IN_PROGRESS_MARKERS: &[&str] = &["진행중", "진행 중"];
const COMPLETED_MARKERS: &[&str] = &["진행완료", "완료"];

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

pub fn project_from_record(record: &ExternalRecord) -> ProjectRecord {
    ProjectRecord {
        id: record.id.clone(),
        title: or_default(record.title(), UNTITLED),
        status: or_default(record.value("status"), UNDECIDED),
        stage: or_default(record.value("stage"), EMPTY),
        stage_ally: or_default(record.value("stage_ally"), EMPTY),
        pm: or_default(record.value("pm"), EMPTY),
        company: or_default(record.value("company"), EMPTY),
        stakeholder: or_default(record.value("stakeholder"), EMPTY),
        training: record.flag("training"),
        genai: record.flag("genai"),
        digital_output: record.flag("digital_output"),
        expected_schedule: format_date_range(record.value("expected_schedule").as_deref()),
        project_doc: record.value("project_doc").unwrap_or_default(),
        created_at: format_date(record.created_time.as_deref()),
    }
}

pub fn service_from_record(record: &ExternalRecord) -> ServiceRecord {
    ServiceRecord {
        id: record.id.clone(),
        title: or_default(record.title(), EMPTY),
        status: or_default(record.value("status"), EMPTY),
        company: or_default(record.value("company"), EMPTY),
        po: or_default(record.value("po"), EMPTY),
        sw: or_default(record.value("sw"), EMPTY),
        make: or_default(record.value("make"), UNASSIGNED_MAKE),
        service_url: or_default(record.value("service_url"), EMPTY),
    }
}

/// All project rows of a query, in payload order; empty on error
pub fn projects(response: &QueryResponse) -> Vec<ProjectRecord> {
    response.results.iter().map(project_from_record).collect()
}

pub fn services(response: &QueryResponse) -> Vec<ServiceRecord> {
    response.results.iter().map(service_from_record).collect()
}

/// Rows whose title, status, PM, company or stage contain `term`
///
/// A blank term keeps every row.
pub fn filter_projects<'a>(projects: &'a [ProjectRecord], term: &str) -> Vec<&'a ProjectRecord> {
    let term = term.trim();
    projects
        .iter()
        .filter(|project| term.is_empty() || project.matches(term))
        .collect()
}

fn stage_has(stage: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| stage.contains(marker))
}

pub fn project_stats(projects: &[ProjectRecord]) -> ProjectStats {
    let total = projects.len();
    let count = |markers: &[&str]| {
        projects
            .iter()
            .filter(|p| stage_has(&p.stage, markers))
            .count()
    };

    let planning = count(PLANNING_MARKERS);
    let in_progress = count(IN_PROGRESS_MARKERS);
    let completed = count(COMPLETED_MARKERS);

    ProjectStats {
        total,
        planning,
        in_progress,
        completed,
        distribution: vec![
            ChartSlice::new(STAGE_PLANNING, planning, total),
            ChartSlice::new(STAGE_IN_PROGRESS, in_progress, total),
            ChartSlice::new(STAGE_COMPLETED, completed, total),
        ],
    }
}

/// Counts per distinct value, largest first, ties by name
fn distribution<'a, I>(values: I, total: usize) -> Vec<ChartSlice>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut slices: Vec<ChartSlice> = counts
        .into_iter()
        .map(|(name, value)| ChartSlice::new(name, value, total))
        .collect();
    // BTreeMap order gives the name tiebreak; sort is stable
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}

pub fn service_summary(services: &[ServiceRecord]) -> ServiceSummary {
    let total = services.len();
    let assigned: Vec<&ServiceRecord> = services.iter().filter(|s| s.po != EMPTY).collect();

    ServiceSummary {
        total_count: total,
        assigned_count: assigned.len(),
        status_data: distribution(services.iter().map(|s| s.status.as_str()), total),
        po_data: distribution(assigned.iter().map(|s| s.po.as_str()), total),
        sw_data: distribution(services.iter().map(|s| s.sw.as_str()), total),
        make_data: distribution(services.iter().map(|s| s.make.as_str()), total),
    }
}

/// Compared columns and their report labels
const TRACKED_FIELDS: &[(&str, &str)] = &[
    ("title", "프로젝트명"),
    ("status", "상태"),
    ("stage", "단계"),
    ("stage_ally", "단계 동맹"),
    ("pm", "PM"),
    ("company", "회사"),
    ("stakeholder", "이해관계자"),
    ("training", "교육"),
    ("genai", "생성형 AI"),
    ("digital_output", "디지털 산출물"),
    ("expected_schedule", "예상 일정"),
    ("project_doc", "프로젝트 문서"),
];

fn field_text(project: &ProjectRecord, field: &str) -> String {
    match field {
        "title" => project.title.clone(),
        "status" => project.status.clone(),
        "stage" => project.stage.clone(),
        "stage_ally" => project.stage_ally.clone(),
        "pm" => project.pm.clone(),
        "company" => project.company.clone(),
        "stakeholder" => project.stakeholder.clone(),
        "training" => project.training.to_string(),
        "genai" => project.genai.to_string(),
        "digital_output" => project.digital_output.to_string(),
        "expected_schedule" => project.expected_schedule.clone(),
        "project_doc" => project.project_doc.clone(),
        _ => String::new(),
    }
}

/// What changed between two project snapshots, matched by id
pub fn diff_projects(old: &[ProjectRecord], new: &[ProjectRecord]) -> ChangeReport {
    let old_by_id: HashMap<&str, &ProjectRecord> =
        old.iter().map(|p| (p.id.as_str(), p)).collect();
    let new_ids: HashMap<&str, ()> = new.iter().map(|p| (p.id.as_str(), ())).collect();

    let mut report = ChangeReport::default();

    for project in new {
        let Some(previous) = old_by_id.get(project.id.as_str()) else {
            report.added.push(project.clone());
            continue;
        };

        let changes: Vec<FieldChange> = TRACKED_FIELDS
            .iter()
            .filter_map(|(field, label)| {
                let old_value = field_text(previous, field);
                let new_value = field_text(project, field);
                (old_value != new_value).then(|| FieldChange {
                    field: field.to_string(),
                    label: label.to_string(),
                    old_value,
                    new_value,
                })
            })
            .collect();

        if !changes.is_empty() {
            report.modified.push(ProjectChange {
                item: project.clone(),
                changes,
            });
        }
    }

    report.removed = old
        .iter()
        .filter(|p| !new_ids.contains_key(p.id.as_str()))
        .cloned()
        .collect();

    report
}
