//! Per-type value extraction
//!
//! Two separate paths: [`Property::scalar`] renders any property as display
//! text, [`Property::flag`] answers yes/no for flag columns. Neither panics or
//! errors; unreadable shapes come back as `None` / `false`.

use super::property::{FormulaValue, Property, RichText, RollupValue, SelectOption, User};
use serde_json::Value;
use tracing::{debug, warn};

/// Select names that count as "yes" for flag columns
pub const AFFIRMATIVE_TOKENS: &[&str] = &["Yes", "있음"];

impl Property {
    /// Display text for this property, `None` when empty
    pub fn scalar(&self) -> Option<String> {
        match self {
            Property::Select { select } => select.as_ref().and_then(|s| non_empty(&s.name)),
            Property::MultiSelect { multi_select } => join_names(multi_select),
            Property::RichText { rich_text } => plain_text(rich_text),
            Property::Title { title } => plain_text(title),
            Property::People { people } => join_people(people),
            Property::Date { date } => date.as_ref().and_then(|d| d.start.as_deref().and_then(non_empty)),
            Property::Url { url } => url.as_deref().and_then(non_empty),
            Property::Email { email } => email.as_deref().and_then(non_empty),
            Property::PhoneNumber { phone_number } => phone_number.as_deref().and_then(non_empty),
            Property::Checkbox { checkbox } => Some(yes_no(*checkbox)),
            Property::Number { number } => number.map(format_number),
            Property::Formula { formula } => formula_scalar(formula),
            Property::Relation { relation } => {
                let ids: Vec<&str> = relation.iter().map(|r| r.id.as_str()).collect();
                non_empty(&ids.join(", "))
            }
            Property::Rollup { rollup } => rollup_scalar(rollup),
            Property::CreatedTime { created_time } => created_time.as_deref().and_then(non_empty),
            Property::LastEditedTime { last_edited_time } => {
                last_edited_time.as_deref().and_then(non_empty)
            }
            Property::CreatedBy { created_by } => user_name(created_by.as_ref()),
            Property::LastEditedBy { last_edited_by } => user_name(last_edited_by.as_ref()),
            Property::Unsupported => None,
        }
    }

    /// Boolean reading for flag columns
    ///
    /// True only for a ticked checkbox or a select whose option is one of
    /// [`AFFIRMATIVE_TOKENS`]. Every other type is false.
    pub fn flag(&self) -> bool {
        match self {
            Property::Checkbox { checkbox } => *checkbox,
            Property::Select {
                select: Some(SelectOption { name }),
            } => AFFIRMATIVE_TOKENS.contains(&name.as_str()),
            _ => false,
        }
    }
}

/// Decode and render one raw property object
///
/// Malformed payloads are logged and yield `None`.
pub fn extract_value(raw: &Value) -> Option<String> {
    match Property::from_value(raw) {
        Ok(Property::Unsupported) => {
            debug!(kind = ?raw.get("type"), "Unsupported property type");
            None
        }
        Ok(property) => property.scalar(),
        Err(e) => {
            warn!(kind = ?raw.get("type"), error = %e, "Malformed property payload");
            None
        }
    }
}

/// Decode one raw property object as a flag; malformed payloads are `false`
pub fn extract_flag(raw: &Value) -> bool {
    match Property::from_value(raw) {
        Ok(property) => property.flag(),
        Err(e) => {
            warn!(kind = ?raw.get("type"), error = %e, "Malformed flag property");
            false
        }
    }
}

fn formula_scalar(formula: &FormulaValue) -> Option<String> {
    match formula {
        FormulaValue::Text { string } => string.as_deref().and_then(non_empty),
        FormulaValue::Number { number } => number.map(format_number),
        FormulaValue::Boolean { boolean } => boolean.map(yes_no),
        FormulaValue::Date { date } => date.as_ref().and_then(|d| d.start.as_deref().and_then(non_empty)),
        FormulaValue::Unsupported => None,
    }
}

fn rollup_scalar(rollup: &RollupValue) -> Option<String> {
    match rollup {
        RollupValue::Array { array } => {
            let parts: Vec<String> = array.iter().filter_map(extract_value).collect();
            non_empty(&parts.join(", "))
        }
        RollupValue::Number { number } => number.map(format_number),
        RollupValue::Date { date } => date.as_ref().and_then(|d| d.start.as_deref().and_then(non_empty)),
        RollupValue::Unsupported => None,
    }
}

fn plain_text(runs: &[RichText]) -> Option<String> {
    let text: String = runs.iter().map(|run| run.plain_text.as_str()).collect();
    non_empty(&text)
}

fn join_names(options: &[SelectOption]) -> Option<String> {
    let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
    non_empty(&names.join(", "))
}

fn join_people(people: &[User]) -> Option<String> {
    let names: Vec<&str> = people.iter().filter_map(|p| p.name.as_deref()).collect();
    non_empty(&names.join(", "))
}

fn user_name(user: Option<&User>) -> Option<String> {
    user.and_then(|u| u.name.as_deref()).and_then(non_empty)
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Render a number the way the dashboard shows it: integral values without a
/// fractional part
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
