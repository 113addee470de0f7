//! Typed view of one Notion property value
//!
//! Notion sends every property as `{"id": ..., "type": "<tag>", "<tag>": payload}`.
//! Decoding into [`Property`] happens per field, so a malformed payload only
//! loses that one field.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    People {
        #[serde(default)]
        people: Vec<User>,
    },
    Date {
        date: Option<DateValue>,
    },
    Url {
        url: Option<String>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Number {
        number: Option<f64>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    Formula {
        formula: FormulaValue,
    },
    Relation {
        #[serde(default)]
        relation: Vec<RelationRef>,
    },
    Rollup {
        rollup: RollupValue,
    },
    CreatedTime {
        created_time: Option<String>,
    },
    CreatedBy {
        created_by: Option<User>,
    },
    LastEditedTime {
        last_edited_time: Option<String>,
    },
    LastEditedBy {
        last_edited_by: Option<User>,
    },
    /// Any tag this crate does not read (status, files, unique_id, ...)
    #[serde(other)]
    Unsupported,
}

impl Property {
    /// Decode a raw property object
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Property::deserialize(value)
    }

    /// The Notion type tag
    pub fn kind(&self) -> &'static str {
        match self {
            Property::Select { .. } => "select",
            Property::MultiSelect { .. } => "multi_select",
            Property::RichText { .. } => "rich_text",
            Property::Title { .. } => "title",
            Property::People { .. } => "people",
            Property::Date { .. } => "date",
            Property::Url { .. } => "url",
            Property::Checkbox { .. } => "checkbox",
            Property::Number { .. } => "number",
            Property::Email { .. } => "email",
            Property::PhoneNumber { .. } => "phone_number",
            Property::Formula { .. } => "formula",
            Property::Relation { .. } => "relation",
            Property::Rollup { .. } => "rollup",
            Property::CreatedTime { .. } => "created_time",
            Property::CreatedBy { .. } => "created_by",
            Property::LastEditedTime { .. } => "last_edited_time",
            Property::LastEditedBy { .. } => "last_edited_by",
            Property::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// One run of rich text; only the plain rendering is kept
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    #[serde(rename = "string")]
    Text { string: Option<String> },
    Number { number: Option<f64> },
    Boolean { boolean: Option<bool> },
    Date { date: Option<DateValue> },
    #[serde(other)]
    Unsupported,
}

/// Rollup payload; array items are themselves property objects
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupValue {
    Array {
        #[serde(default)]
        array: Vec<Value>,
    },
    Number {
        number: Option<f64>,
    },
    Date {
        date: Option<DateValue>,
    },
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_select() {
        let property = Property::from_value(&json!({
            "id": "abc",
            "type": "select",
            "select": {"id": "1", "name": "진행중", "color": "blue"}
        }))
        .unwrap();

        assert_eq!(
            property,
            Property::Select {
                select: Some(SelectOption {
                    name: "진행중".to_string()
                })
            }
        );
        assert_eq!(property.kind(), "select");
    }

    #[test]
    fn test_decode_unknown_tag_is_unsupported() {
        let property = Property::from_value(&json!({
            "type": "files",
            "files": [{"name": "a.pdf"}]
        }))
        .unwrap();
        assert_eq!(property, Property::Unsupported);
    }

    #[test]
    fn test_decode_null_select() {
        let property = Property::from_value(&json!({"type": "select", "select": null})).unwrap();
        assert_eq!(property, Property::Select { select: None });
    }

    #[test]
    fn test_decode_malformed_payload_fails() {
        assert!(Property::from_value(&json!({"type": "select", "select": 42})).is_err());
        assert!(Property::from_value(&json!("not an object")).is_err());
    }

    #[test]
    fn test_decode_formula_subtype() {
        let property = Property::from_value(&json!({
            "type": "formula",
            "formula": {"type": "boolean", "boolean": true}
        }))
        .unwrap();
        assert_eq!(
            property,
            Property::Formula {
                formula: FormulaValue::Boolean {
                    boolean: Some(true)
                }
            }
        );
    }
}
