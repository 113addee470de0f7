//! Property normalizer
//!
//! Pure functions from a record's raw `properties` map to flat display values.
//! Every lookup is independent: a missing or malformed field yields `None` /
//! `false` and never affects its siblings.

mod extract;
mod format;
mod lookup;
mod property;

pub use extract::{extract_flag, extract_value, format_number, AFFIRMATIVE_TOKENS};
pub use format::{format_date, format_date_range, format_relative, NO_DATE};
pub use lookup::{candidates, find_by_type, find_property, FieldAlias, FIELD_ALIASES};
pub use property::{
    DateValue, FormulaValue, Property, RelationRef, RichText, RollupValue, SelectOption, User,
};

use serde_json::{Map, Value};

/// Display value of logical `field`, resolved through the alias table
pub fn property_value(properties: &Map<String, Value>, field: &str) -> Option<String> {
    find_property(properties, field).and_then(|(_, raw)| extract_value(raw))
}

/// Flag value of logical `field`; absent fields are `false`
pub fn property_flag(properties: &Map<String, Value>, field: &str) -> bool {
    find_property(properties, field).is_some_and(|(_, raw)| extract_flag(raw))
}

/// Record title: the `title` field or its aliases, else the first
/// title-typed property
pub fn title_value(properties: &Map<String, Value>) -> Option<String> {
    property_value(properties, "title")
        .or_else(|| find_by_type(properties, "title").and_then(extract_value))
}
