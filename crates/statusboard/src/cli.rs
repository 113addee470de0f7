//! Terminal output for the CLI commands
//!
//! Every formatter returns a `String` so commands stay thin and the output is
//! testable without a terminal.

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use statusboard_core::config::REQUIRED_ENV_VARS;
use statusboard_core::normalize::format_relative;
use statusboard_core::{SchemaReport, ServicesPage};
use statusboard_types::{ChangeReport, ChartSlice, HelpRequest, ProjectRecord, ProjectStats};

// ============================================================================
// Tables
// ============================================================================

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Project rows (already filtered) plus stage counts over the full list
pub fn format_projects(
    projects: &[&ProjectRecord],
    stats: &ProjectStats,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(&serde_json::json!({
            "projects": projects,
            "stats": stats,
        }));
    }

    let summary = format!(
        "전체 {} · 계획 {} · 진행중 {} · 완료 {}",
        stats.total, stats.planning, stats.in_progress, stats.completed
    );
    if projects.is_empty() {
        return format!("No projects found.\n{}", summary);
    }

    let mut table = new_table(
        &["Title", "Stage", "Status", "PM", "Company", "Schedule", "Flags"],
        no_color,
    );
    for project in projects {
        table.add_row(vec![
            Cell::new(truncate(&project.title, 40)),
            Cell::new(&project.stage),
            Cell::new(&project.status),
            Cell::new(&project.pm),
            Cell::new(&project.company),
            Cell::new(&project.expected_schedule),
            Cell::new(project_flags(project)),
        ]);
    }

    format!("{}\n{}", table, summary)
}

fn project_flags(project: &ProjectRecord) -> String {
    let flags: Vec<&str> = [
        (project.training, "training"),
        (project.genai, "genai"),
        (project.digital_output, "digital"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    flags.join(",")
}

pub fn format_changes(report: &ChangeReport) -> String {
    let mut lines = vec![format!("변경 사항 {}건", report.total())];
    lines.extend(report.added.iter().map(|p| format!("  + {}", p.title)));
    lines.extend(report.removed.iter().map(|p| format!("  - {}", p.title)));
    for change in &report.modified {
        lines.push(format!("  ~ {}", change.item.title));
        lines.extend(change.changes.iter().map(|c| {
            format!("      {}: {} → {}", c.label, c.old_value, c.new_value)
        }));
    }
    lines.join("\n")
}

pub fn format_services(page: &ServicesPage, json: bool, no_color: bool) -> String {
    if json {
        return to_json(page);
    }
    if page.services.is_empty() {
        return "No services found.".to_string();
    }

    let mut table = new_table(&["Title", "Status", "Company", "PO", "SW", "Make"], no_color);
    for service in &page.services {
        table.add_row(vec![
            truncate(&service.title, 40),
            service.status.clone(),
            service.company.clone(),
            service.po.clone(),
            service.sw.clone(),
            service.make.clone(),
        ]);
    }

    let summary = &page.summary;
    format!(
        "{}\n{} services, {} with a PO\nStatus: {}\nMake:   {}",
        table,
        summary.total_count,
        summary.assigned_count,
        format_distribution(&summary.status_data),
        format_distribution(&summary.make_data)
    )
}

fn format_distribution(slices: &[ChartSlice]) -> String {
    slices
        .iter()
        .map(|s| format!("{} {} ({}%)", s.name, s.value, s.percentage))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_schema(report: &SchemaReport, json: bool, no_color: bool) -> String {
    if json {
        return to_json(report);
    }

    let mut table = new_table(&["Property", "Type", "Options"], no_color);
    for (name, kind) in &report.property_types {
        let options = report
            .stage_properties
            .iter()
            .find(|p| &p.name == name)
            .map(|p| p.options.join(", "))
            .unwrap_or_default();
        table.add_row(vec![name.as_str(), kind.as_str(), options.as_str()]);
    }

    format!(
        "{} ({})\n{} properties, {} stage-like\n{}",
        report.title,
        report.database_id,
        report.property_count,
        report.stage_properties.len(),
        table
    )
}

/// One line per required variable, set or missing
pub fn format_env_status(missing: &[String], no_color: bool) -> String {
    let mut table = new_table(&["Variable", "Status"], no_color);
    for name in REQUIRED_ENV_VARS {
        let is_missing = missing.iter().any(|m| m == name);
        let status = if is_missing { "missing" } else { "set" };
        let cell = if no_color {
            Cell::new(status)
        } else if is_missing {
            Cell::new(status).fg(Color::Red)
        } else {
            Cell::new(status).fg(Color::Green)
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    table.to_string()
}

pub fn format_missing(missing: &[String]) -> String {
    format!(
        "Missing environment variables: {}. Affected pages show sample data.",
        missing.join(", ")
    )
}

pub fn format_requests(
    requests: &[HelpRequest],
    now: DateTime<Utc>,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(requests);
    }
    if requests.is_empty() {
        return "No help requests yet.".to_string();
    }

    let mut table = new_table(&["ID", "", "Content", "Likes", "Posted"], no_color);
    for request in requests {
        table.add_row(vec![
            request.id.clone(),
            request.emoji.clone(),
            truncate(&request.content, 60),
            request.likes.to_string(),
            format_relative(request.created_at, now),
        ]);
    }
    table.to_string()
}

// ============================================================================
// Utilities
// ============================================================================

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        // char-based so Hangul and emoji never split
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn project(title: &str, stage: &str) -> ProjectRecord {
        ProjectRecord {
            id: title.to_string(),
            title: title.to_string(),
            status: "-".to_string(),
            stage: stage.to_string(),
            stage_ally: "-".to_string(),
            pm: "김PM".to_string(),
            company: "-".to_string(),
            stakeholder: "-".to_string(),
            training: true,
            genai: false,
            digital_output: true,
            expected_schedule: "2025. 03. 01.".to_string(),
            project_doc: String::new(),
            created_at: "2025. 02. 17.".to_string(),
        }
    }

    #[test]
    fn test_truncate_hangul() {
        assert_eq!(truncate("프로젝트 관리", 4), "프로젝…");
        assert_eq!(truncate("짧음", 10), "짧음");
    }

    #[test]
    fn test_format_projects_table() {
        let a = project("AI 비서", "진행중");
        let stats = ProjectStats {
            total: 3,
            in_progress: 1,
            ..ProjectStats::default()
        };
        let output = format_projects(&[&a], &stats, false, true);
        assert!(output.contains("AI 비서"));
        assert!(output.contains("training,digital"));
        assert!(output.contains("전체 3"));
    }

    #[test]
    fn test_format_projects_empty_and_json() {
        let stats = ProjectStats::default();
        assert!(format_projects(&[], &stats, false, true).starts_with("No projects found."));

        let a = project("AI 비서", "진행중");
        let json: serde_json::Value =
            serde_json::from_str(&format_projects(&[&a], &stats, true, true)).unwrap();
        assert_eq!(json["projects"][0]["title"], "AI 비서");
    }

    #[test]
    fn test_format_env_status_marks_missing() {
        let output = format_env_status(&["SUPABASE_URL".to_string()], true);
        let line = output
            .lines()
            .find(|l| l.contains("SUPABASE_URL"))
            .unwrap();
        assert!(line.contains("missing"));
        let key_line = output
            .lines()
            .find(|l| l.contains("NOTION_API_KEY"))
            .unwrap();
        assert!(key_line.contains("set"));
    }

    #[test]
    fn test_format_requests_relative_time() {
        let now = Utc::now();
        let request = HelpRequest {
            id: "7".to_string(),
            content: "배포가 실패해요".to_string(),
            emoji: "🆘".to_string(),
            author: "익명".to_string(),
            created_at: now - Duration::minutes(5),
            views: 0,
            likes: 2,
        };
        let output = format_requests(&[request], now, false, true);
        assert!(output.contains("5분 전"));
        assert!(output.contains("배포가 실패해요"));
        assert_eq!(format_requests(&[], now, false, true), "No help requests yet.");
    }

    #[test]
    fn test_format_changes_lists_fields() {
        let before = project("AI 비서", "진행중");
        let mut after = before.clone();
        after.stage = "진행완료".to_string();
        let report = ChangeReport {
            added: vec![project("신규", "후보")],
            removed: vec![],
            modified: vec![statusboard_types::ProjectChange {
                item: after,
                changes: vec![statusboard_types::FieldChange {
                    field: "stage".to_string(),
                    label: "단계".to_string(),
                    old_value: "진행중".to_string(),
                    new_value: "진행완료".to_string(),
                }],
            }],
        };
        let output = format_changes(&report);
        assert!(output.starts_with("변경 사항 2건"));
        assert!(output.contains("+ 신규"));
        assert!(output.contains("단계: 진행중 → 진행완료"));
    }
}
