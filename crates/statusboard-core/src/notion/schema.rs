//! Database schema (property definitions) as reported by the Notion API

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Property definition from a database object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub id: String,
    pub name: String,
    /// Notion type tag (select, title, ...)
    pub kind: String,
    /// Option names for select / multi_select columns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl PropertySchema {
    /// Name suggests a pipeline stage column
    pub fn is_stage_like(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("stage") || name.contains("단계")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSchema {
    pub id: String,
    pub title: String,
    /// Keyed by property name
    pub properties: BTreeMap<String, PropertySchema>,
}

impl DatabaseSchema {
    /// Lenient decode of a database object; unreadable parts are skipped
    pub fn from_value(database_id: &str, raw: &Value) -> Self {
        let title = raw
            .get("title")
            .and_then(Value::as_array)
            .map(|runs| {
                runs.iter()
                    .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                    .collect::<String>()
            })
            .unwrap_or_default();

        let properties = raw
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, def)| (name.clone(), property_schema(name, def)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: raw
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(database_id)
                .to_string(),
            title,
            properties,
        }
    }

    pub fn stage_properties(&self) -> Vec<&PropertySchema> {
        self.properties.values().filter(|p| p.is_stage_like()).collect()
    }

    /// Summary used by the schema endpoint and the `schema` command
    pub fn report(&self) -> SchemaReport {
        SchemaReport {
            database_id: self.id.clone(),
            title: self.title.clone(),
            property_count: self.properties.len(),
            property_types: self
                .properties
                .values()
                .map(|p| (p.name.clone(), p.kind.clone()))
                .collect(),
            stage_properties: self.stage_properties().into_iter().cloned().collect(),
        }
    }
}

fn property_schema(name: &str, def: &Value) -> PropertySchema {
    let kind = def
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let options = def
        .get(&kind)
        .and_then(|payload| payload.get("options"))
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|o| o.get("name").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    PropertySchema {
        id: def.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        name: name.to_string(),
        kind,
        options,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub database_id: String,
    pub title: String,
    pub property_count: usize,
    pub property_types: BTreeMap<String, String>,
    pub stage_properties: Vec<PropertySchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_database_object() {
        let raw = json!({
            "object": "database",
            "id": "db-1",
            "title": [{"plain_text": "2025 "}, {"plain_text": "프로젝트"}],
            "properties": {
                "이름": {"id": "title", "type": "title", "title": {}},
                "단계": {
                    "id": "s1",
                    "type": "select",
                    "select": {"options": [{"name": "진행중"}, {"name": "진행완료"}]}
                },
                "Stage Ally": {"id": "s2", "type": "rich_text", "rich_text": {}},
                "PM": {"id": "p", "type": "people", "people": {}}
            }
        });

        let schema = DatabaseSchema::from_value("ignored", &raw);
        assert_eq!(schema.id, "db-1");
        assert_eq!(schema.title, "2025 프로젝트");
        assert_eq!(schema.properties.len(), 4);
        assert_eq!(schema.properties["단계"].options, vec!["진행중", "진행완료"]);

        let stages: Vec<&str> = schema
            .stage_properties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(stages, vec!["Stage Ally", "단계"]);

        let report = schema.report();
        assert_eq!(report.property_count, 4);
        assert_eq!(report.property_types["PM"], "people");
    }

    #[test]
    fn test_schema_from_garbage_is_empty() {
        let schema = DatabaseSchema::from_value("db-x", &json!({"unexpected": true}));
        assert_eq!(schema.id, "db-x");
        assert!(schema.title.is_empty());
        assert!(schema.properties.is_empty());
    }
}
