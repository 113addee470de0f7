//! Server-rendered status page
//!
//! One HTML document: setup warnings, the fetch error panel, stage cards and
//! the project table. Every interpolated value goes through [`escape_html`].

use statusboard_core::{DegradedState, ProjectsPage};
use statusboard_types::ProjectRecord;
use std::fmt::Write;

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: system-ui, -apple-system, sans-serif; background: #f5f5f5; color: #1a1a1a; padding: 2rem; }
        h1 { font-size: 1.75rem; margin-bottom: 1rem; }
        .setup-warning { background: #fff8e1; border-left: 3px solid #f0a500; padding: 1rem; margin-bottom: 1rem; }
        .error-panel { background: #fdecea; border-left: 3px solid #d93025; padding: 1rem; margin-bottom: 1rem; }
        .error-panel .status { font-family: monospace; color: #a50e0e; }
        .cards { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
        .card { background: white; padding: 1rem 1.5rem; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }
        .card strong { display: block; font-size: 1.5rem; }
        table { width: 100%; border-collapse: collapse; background: white; }
        th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #ddd; }
        .updated { margin-top: 1rem; color: #666; font-size: 0.875rem; }
"#;

/// Escape text for HTML element and attribute content
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_status_page(page: &ProjectsPage, state: &DegradedState) -> String {
    let mut body = String::new();

    if let DegradedState::PartialData { missing, .. } = state {
        let _ = write!(
            body,
            r#"<div class="setup-warning"><strong>설정이 필요합니다</strong><p>누락된 환경변수: <code>{}</code></p></div>"#,
            escape_html(&missing.join(", "))
        );
    }

    match &page.status.error {
        Some(error) => {
            let status = page
                .status
                .status_code
                .map(|code| format!(r#"<p class="status">HTTP {}</p>"#, code))
                .unwrap_or_default();
            let _ = write!(
                body,
                r#"<div class="error-panel"><strong>데이터를 불러오지 못했습니다</strong><p>{}</p>{}</div>"#,
                escape_html(error),
                status
            );
        }
        None => {
            render_cards(&mut body, page);
            render_table(&mut body, &page.projects);
        }
    }

    if let Some(updated) = page.status.last_updated {
        let _ = write!(
            body,
            r#"<p class="updated">마지막 업데이트: {}</p>"#,
            updated.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>statusboard</title>
    <style>{style}</style>
</head>
<body>
    <h1>프로젝트 현황</h1>
    {body}
</body>
</html>"#,
        style = STYLE,
    )
}

fn render_cards(out: &mut String, page: &ProjectsPage) {
    let stats = &page.stats;
    out.push_str(r#"<div class="cards">"#);
    for (label, value) in [
        ("전체", stats.total),
        ("계획", stats.planning),
        ("진행중", stats.in_progress),
        ("완료", stats.completed),
    ] {
        let _ = write!(
            out,
            r#"<div class="card"><span>{label}</span><strong>{value}</strong></div>"#
        );
    }
    out.push_str("</div>");
}

fn render_table(out: &mut String, projects: &[ProjectRecord]) {
    if projects.is_empty() {
        out.push_str("<p>표시할 프로젝트가 없습니다.</p>");
        return;
    }

    out.push_str(
        "<table><thead><tr><th>프로젝트</th><th>단계</th><th>상태</th><th>PM</th><th>회사</th><th>일정</th></tr></thead><tbody>",
    );
    for project in projects {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&project.title),
            escape_html(&project.stage),
            escape_html(&project.status),
            escape_html(&project.pm),
            escape_html(&project.company),
            escape_html(&project.expected_schedule),
        );
    }
    out.push_str("</tbody></table>");
}
