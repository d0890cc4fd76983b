//! Form schema records and the editor draft snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Field;

/// Name given to new and unnamed forms.
pub const DEFAULT_FORM_NAME: &str = "Untitled Form";

/// A persisted form: the record shape shared by both stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "fields_or_empty")]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Order records newest first; records without a timestamp go last.
pub fn sort_by_updated_desc(forms: &mut [FormSchema]) {
    forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Editor state as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default, deserialize_with = "id_or_none")]
    pub id: Option<String>,
    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "fields_or_empty")]
    pub fields: Vec<Field>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            id: None,
            name: default_name(),
            fields: Vec::new(),
        }
    }
}

fn default_name() -> String {
    DEFAULT_FORM_NAME.to_string()
}

fn name_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if name.is_empty() {
        DEFAULT_FORM_NAME.to_string()
    } else {
        name
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|id| !id.is_empty()))
}

/// Keep every well-formed field; a null or non-array value reads as no fields.
fn fields_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Field>, D::Error> {
    let serde_json::Value::Array(entries) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    let total = entries.len();
    let fields: Vec<Field> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if fields.len() != total {
        tracing::warn!("Skipped {} malformed field(s)", total - fields.len());
    }
    Ok(fields)
}
