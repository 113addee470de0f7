//! Property key resolution
//!
//! Databases are maintained by hand, so the same logical column shows up as
//! `stage`, `Stage` or `단계`. Resolution order: exact key, exact alias,
//! then a case-insensitive scan over the field and its aliases.

use serde_json::{Map, Value};

/// A logical field and the other names it is known by
#[derive(Debug, Clone, Copy)]
pub struct FieldAlias {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

impl FieldAlias {
    fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.canonical).chain(self.aliases.iter().copied())
    }

    fn contains(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.names().any(|name| name.to_lowercase() == field)
    }
}

/// Known bilingual aliases, in lookup order
pub const FIELD_ALIASES: &[FieldAlias] = &[
    FieldAlias { canonical: "stage", aliases: &["단계"] },
    FieldAlias { canonical: "title", aliases: &["이름", "Name", "서비스명"] },
    FieldAlias { canonical: "status", aliases: &["상태"] },
    FieldAlias { canonical: "pm", aliases: &["PM"] },
    FieldAlias { canonical: "company", aliases: &["회사"] },
    FieldAlias { canonical: "stakeholder", aliases: &["이해관계자"] },
    FieldAlias { canonical: "training", aliases: &["교육"] },
    FieldAlias { canonical: "genai", aliases: &["생성형 AI"] },
    FieldAlias { canonical: "digital_output", aliases: &["디지털 산출물"] },
    FieldAlias { canonical: "expected_schedule", aliases: &["Expected Schedule", "일정"] },
    FieldAlias { canonical: "project_doc", aliases: &["Project Doc"] },
    FieldAlias { canonical: "service_url", aliases: &["Service URL", "URL"] },
];

/// Names to try for `field`: the field itself first, then its aliases
pub fn candidates(field: &str) -> Vec<&str> {
    let mut names = vec![field];
    if let Some(group) = FIELD_ALIASES.iter().find(|g| g.contains(field)) {
        for name in group.names() {
            if name != field {
                names.push(name);
            }
        }
    }
    names
}

/// Resolve `field` to the actual `(key, value)` pair in `properties`
pub fn find_property<'a>(
    properties: &'a Map<String, Value>,
    field: &str,
) -> Option<(&'a str, &'a Value)> {
    let names = candidates(field);

    // 1 + 2: exact key, then exact alias
    for name in &names {
        if let Some((key, value)) = properties.get_key_value(*name) {
            return Some((key.as_str(), value));
        }
    }

    // 3: case-insensitive, preferring earlier candidates
    for name in &names {
        let wanted = name.to_lowercase();
        if let Some((key, value)) = properties
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
        {
            return Some((key.as_str(), value));
        }
    }

    None
}

/// First property whose type tag is `kind`
pub fn find_by_type<'a>(properties: &'a Map<String, Value>, kind: &str) -> Option<&'a Value> {
    properties
        .values()
        .find(|value| value.get("type").and_then(Value::as_str) == Some(kind))
}
