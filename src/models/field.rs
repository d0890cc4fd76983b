//! Field model: one input definition within a form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options attached to new select and radio fields.
pub const DEFAULT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Input kind of a field.
///
/// Unrecognised kinds are kept verbatim so they survive a save/load cycle,
/// but no renderer displays them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Textarea,
    Checkbox,
    Select,
    Radio,
    Date,
    Number,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Other(s) => s,
        }
    }

    /// Kinds that carry an options list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    /// Label given to a freshly created field, e.g. "Textarea field".
    pub fn default_label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} field", first.to_uppercase(), chars.as_str()),
            None => "Field".to_string(),
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        match s {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "textarea" => FieldType::Textarea,
            "checkbox" => FieldType::Checkbox,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "date" => FieldType::Date,
            "number" => FieldType::Number,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        FieldType::from(s.as_str())
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        match kind {
            FieldType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// One form input definition.
///
/// Attributes that do not apply to `kind` are carried but ignored by renderers.
/// Attributes this version does not know about are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_checked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create a field of `kind` with a fresh id and the kind's default attributes.
pub fn create_field(kind: impl Into<FieldType>) -> Field {
    let kind = kind.into();
    let options = kind
        .has_options()
        .then(|| DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect());
    let checked = (kind == FieldType::Checkbox).then_some(false);

    Field {
        id: uuid::Uuid::new_v4().to_string(),
        label: kind.default_label(),
        kind,
        placeholder: None,
        options,
        checked,
        default_checked: None,
        extra: Map::new(),
    }
}

/// Partial attribute update for a field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// Comma separated options as typed into the builder
    #[serde(default)]
    pub options_text: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub default_checked: Option<bool>,
}

impl FieldPatch {
    /// Merge this patch into `field`. `id` and `kind` are never touched.
    pub fn apply(&self, field: &Field) -> Field {
        let mut merged = field.clone();
        if let Some(label) = &self.label {
            merged.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            merged.placeholder = Some(placeholder.clone());
        }
        if let Some(text) = &self.options_text {
            merged.options = Some(parse_options(text));
        }
        if let Some(options) = &self.options {
            merged.options = Some(options.clone());
        }
        if let Some(checked) = self.checked {
            merged.checked = Some(checked);
        }
        if let Some(default_checked) = self.default_checked {
            merged.default_checked = Some(default_checked);
        }
        merged
    }
}

/// Split a comma separated options string, trimming and dropping blanks.
pub fn parse_options(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_defaults() {
        let field = create_field("select");
        assert_eq!(field.kind, FieldType::Select);
        assert_eq!(field.label, "Select field");
        assert_eq!(
            field.options.as_deref(),
            Some(&["Option 1".to_string(), "Option 2".into(), "Option 3".into()][..])
        );
        assert_eq!(field.checked, None);
    }

    #[test]
    fn test_checkbox_defaults() {
        let field = create_field(FieldType::Checkbox);
        assert_eq!(field.label, "Checkbox field");
        assert_eq!(field.checked, Some(false));
        assert!(field.options.is_none());
    }

    #[test]
    fn test_text_has_no_extras() {
        let field = create_field("textarea");
        assert_eq!(field.label, "Textarea field");
        assert!(field.options.is_none());
        assert!(field.checked.is_none());
        assert!(field.placeholder.is_none());
    }

    #[test]
    fn test_unknown_kind_is_not_rejected() {
        let field = create_field("signature");
        assert_eq!(field.kind, FieldType::Other("signature".into()));
        assert_eq!(field.label, "Signature field");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(create_field("text").id, create_field("text").id);
    }

    #[test]
    fn test_wire_shape() {
        let mut field = create_field("checkbox");
        field.default_checked = Some(true);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "checkbox");
        assert_eq!(value["defaultChecked"], true);
        assert!(value.get("placeholder").is_none());
    }

    #[test]
    fn test_unknown_attributes_survive() {
        let value = json!({
            "id": "f1",
            "type": "rating",
            "label": "Stars",
            "max": 5
        });
        let field: Field = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(field.kind, FieldType::Other("rating".into()));
        assert_eq!(serde_json::to_value(&field).unwrap(), value);
    }

    #[test]
    fn test_patch_merges_only_given_attributes() {
        let field = create_field("radio");
        let patch = FieldPatch {
            options_text: Some(" Red, ,Blue ,".into()),
            ..Default::default()
        };
        let merged = patch.apply(&field);
        assert_eq!(merged.id, field.id);
        assert_eq!(merged.label, "Radio field");
        assert_eq!(merged.options, Some(vec!["Red".to_string(), "Blue".into()]));
    }
}
