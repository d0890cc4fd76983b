//! Live preview of the form being edited.
//!
//! The preview keeps its own map of entered values, keyed by field id. Field defaults
//! such as `defaultChecked` never seed it, and it is dropped when another schema is loaded.

pub mod html;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Field, FieldType};

/// A value entered into a preview control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Flag(bool),
    Text(String),
}

impl InputValue {
    fn as_text(&self) -> &str {
        match self {
            InputValue::Text(s) => s,
            InputValue::Flag(_) => "",
        }
    }

    fn as_flag(&self) -> bool {
        match self {
            InputValue::Flag(b) => *b,
            InputValue::Text(s) => !s.is_empty(),
        }
    }
}

/// HTML input kinds rendered as single-line inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Number,
    Date,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Number => "number",
            InputKind::Date => "date",
        }
    }
}

/// An interactive control projected from one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Control {
    Input {
        field_id: String,
        label: String,
        kind: InputKind,
        placeholder: Option<String>,
        value: String,
    },
    TextArea {
        field_id: String,
        label: String,
        placeholder: String,
        rows: u8,
        value: String,
    },
    Checkbox {
        field_id: String,
        label: String,
        checked: bool,
    },
    Select {
        field_id: String,
        label: String,
        prompt: String,
        options: Vec<String>,
        selected: Option<String>,
    },
    Radio {
        field_id: String,
        label: String,
        group: String,
        options: Vec<String>,
        selected: Option<String>,
    },
}

impl Control {
    /// Single-line input. Date inputs carry no placeholder.
    fn input(
        field_id: String,
        label: String,
        kind: InputKind,
        placeholder: String,
        value: String,
    ) -> Self {
        Control::Input {
            field_id,
            label,
            kind,
            placeholder: (kind != InputKind::Date).then_some(placeholder),
            value,
        }
    }

    pub fn field_id(&self) -> &str {
        match self {
            Control::Input { field_id, .. }
            | Control::TextArea { field_id, .. }
            | Control::Checkbox { field_id, .. }
            | Control::Select { field_id, .. }
            | Control::Radio { field_id, .. } => field_id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Control::Input { label, .. }
            | Control::TextArea { label, .. }
            | Control::Checkbox { label, .. }
            | Control::Select { label, .. }
            | Control::Radio { label, .. } => label,
        }
    }
}

/// What the preview panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    pub controls: Vec<Control>,
    /// Entered values, present once the form has at least one field
    pub values: Option<Value>,
}

/// Preview state bound to one editor generation.
#[derive(Debug, Default)]
pub struct Preview {
    generation: u64,
    values: HashMap<String, InputValue>,
}

impl Preview {
    /// Drop entered values if the editor now shows a different schema.
    pub fn sync(&mut self, generation: u64) {
        if generation != self.generation {
            tracing::debug!(
                from = self.generation,
                to = generation,
                "Schema switched; clearing preview values"
            );
            self.values.clear();
            self.generation = generation;
        }
    }

    pub fn set_value(&mut self, field_id: impl Into<String>, value: InputValue) {
        self.values.insert(field_id.into(), value);
    }

    pub fn value(&self, field_id: &str) -> Option<&InputValue> {
        self.values.get(field_id)
    }

    /// Project `fields` into controls. Fields of unknown kind are skipped.
    pub fn render(&self, fields: &[Field]) -> Vec<Control> {
        fields.iter().filter_map(|f| self.control_for(f)).collect()
    }

    pub fn view(&self, fields: &[Field]) -> PreviewView {
        let values = (!fields.is_empty()).then(|| self.values_json());
        PreviewView {
            controls: self.render(fields),
            values,
        }
    }

    /// Entered values as a JSON object.
    pub fn values_json(&self) -> Value {
        let map = self
            .values
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    InputValue::Flag(b) => Value::Bool(*b),
                    InputValue::Text(s) => Value::String(s.clone()),
                };
                (k.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    fn control_for(&self, field: &Field) -> Option<Control> {
        let field_id = field.id.clone();
        let label = if field.label.is_empty() {
            "Field".to_string()
        } else {
            field.label.clone()
        };
        let entered = self.value(&field.id);
        let text = entered.map(InputValue::as_text).unwrap_or_default().to_string();
        let choice = entered
            .map(InputValue::as_text)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let placeholder = field.placeholder.clone().unwrap_or_default();
        let options = field.options.clone().unwrap_or_default();

        let control = match &field.kind {
            FieldType::Text => Control::input(field_id, label, InputKind::Text, placeholder, text),
            FieldType::Email => Control::input(field_id, label, InputKind::Email, placeholder, text),
            FieldType::Number => {
                Control::input(field_id, label, InputKind::Number, placeholder, text)
            }
            FieldType::Date => Control::input(field_id, label, InputKind::Date, placeholder, text),
            FieldType::Textarea => Control::TextArea {
                field_id,
                label,
                placeholder,
                rows: 4,
                value: text,
            },
            FieldType::Checkbox => Control::Checkbox {
                field_id,
                label,
                checked: entered.map(InputValue::as_flag).unwrap_or(false),
            },
            FieldType::Select => Control::Select {
                field_id,
                label,
                prompt: field
                    .placeholder
                    .clone()
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| "Select...".to_string()),
                options,
                selected: choice,
            },
            FieldType::Radio => Control::Radio {
                group: field_id.clone(),
                field_id,
                label,
                options,
                selected: choice,
            },
            FieldType::Other(kind) => {
                tracing::debug!("No preview control for field type {:?}", kind);
                return None;
            }
        };
        Some(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{create_field, FieldPatch};

    #[test]
    fn test_select_renders_edited_options_in_order() {
        let field = create_field("select");
        let field = FieldPatch {
            options: Some(vec!["Red".into(), "Blue".into()]),
            ..Default::default()
        }
        .apply(&field);

        let controls = Preview::default().render(&[field]);
        match &controls[0] {
            Control::Select {
                options,
                prompt,
                selected,
                ..
            } => {
                assert_eq!(options, &["Red".to_string(), "Blue".to_string()]);
                assert_eq!(prompt, "Select...");
                assert_eq!(selected, &None);
            }
            other => panic!("expected select, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_renders_nothing() {
        let fields = vec![create_field("text"), create_field("signature")];
        let controls = Preview::default().render(&fields);
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].field_id(), fields[0].id);
    }

    #[test]
    fn test_defaults_do_not_seed_values() {
        let mut field = create_field("checkbox");
        field.default_checked = Some(true);
        field.checked = Some(true);

        let preview = Preview::default();
        assert_eq!(
            preview.render(&[field.clone()])[0],
            Control::Checkbox {
                field_id: field.id.clone(),
                label: "Checkbox field".into(),
                checked: false,
            }
        );
        assert_eq!(preview.values_json(), serde_json::json!({}));
    }

    #[test]
    fn test_entered_values_flow_into_controls() {
        let text = create_field("text");
        let radio = create_field("radio");
        let mut preview = Preview::default();
        preview.set_value(&text.id, InputValue::Text("hello".into()));
        preview.set_value(&radio.id, InputValue::Text("Option 2".into()));

        let controls = preview.render(&[text.clone(), radio.clone()]);
        assert!(matches!(&controls[0], Control::Input { value, .. } if value == "hello"));
        assert!(matches!(
            &controls[1],
            Control::Radio { selected: Some(s), group, .. } if s == "Option 2" && *group == radio.id
        ));
    }

    #[test]
    fn test_values_cleared_on_schema_switch() {
        let field = create_field("email");
        let mut preview = Preview::default();
        preview.sync(0);
        preview.set_value(&field.id, InputValue::Text("a@b.c".into()));

        preview.sync(0);
        assert!(preview.value(&field.id).is_some());

        preview.sync(1);
        assert!(preview.value(&field.id).is_none());
    }

    #[test]
    fn test_values_panel_hidden_without_fields() {
        let preview = Preview::default();
        assert!(preview.view(&[]).values.is_none());
        assert!(preview.view(&[create_field("date")]).values.is_some());
    }

    #[test]
    fn test_empty_label_falls_back() {
        let mut field = create_field("date");
        field.label.clear();
        field.placeholder = Some("ignored".into());
        let controls = Preview::default().render(&[field]);
        assert_eq!(controls[0].label(), "Field");
        assert!(matches!(&controls[0], Control::Input { placeholder: None, .. }));
    }

    #[test]
    fn test_single_line_kinds() {
        let fields: Vec<_> = ["text", "email", "number", "date"]
            .into_iter()
            .map(create_field)
            .collect();
        let kinds: Vec<_> = Preview::default()
            .render(&fields)
            .into_iter()
            .map(|control| match control {
                Control::Input { kind, .. } => kind,
                other => panic!("expected input, got {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            [InputKind::Text, InputKind::Email, InputKind::Number, InputKind::Date]
        );
    }
}
