//! Display formatting for dates coming out of the normalizer
//!
//! Dates are shown the way the Korean locale prints them, `2025. 02. 17.`,
//! in KST. Unparseable input is passed through as-is.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Placeholder for an absent date
pub const NO_DATE: &str = "-";

/// ISO date or timestamp → `YYYY. MM. DD.`
pub fn format_date(input: Option<&str>) -> String {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return NO_DATE.to_string();
    };

    match parse_local_date(raw) {
        Some(date) => date.format("%Y. %m. %d.").to_string(),
        None => raw.to_string(),
    }
}

/// Like [`format_date`], but free-text ranges containing `→` are kept verbatim
pub fn format_date_range(input: Option<&str>) -> String {
    match input {
        Some(raw) if raw.contains('→') => raw.to_string(),
        other => format_date(other),
    }
}

/// Coarse Korean relative time, e.g. `5분 전`, `약 3시간 전`
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(then).num_minutes().max(0);
    match minutes {
        0 => "방금 전".to_string(),
        1..=59 => format!("{minutes}분 전"),
        60..=1439 => format!("약 {}시간 전", minutes / 60),
        1440..=43199 => format!("{}일 전", minutes / 1440),
        43200..=525_599 => format!("약 {}개월 전", minutes / 43200),
        _ => format!("약 {}년 전", minutes / 525_600),
    }
}

fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    let kst = FixedOffset::east_opt(KST_OFFSET_SECS)?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&kst).date_naive())
}
