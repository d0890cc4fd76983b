//! Editor state: the form currently open in the builder.
//!
//! The field sequence is shared behind an `Arc` and replaced wholesale on every change,
//! so observers can detect changes by pointer identity or by `revision`.

use std::sync::Arc;

use serde::Serialize;

use crate::builder::{self, Direction};
use crate::db::KeyValueStore;
use crate::errors::AppError;
use crate::models::{Draft, Field, FieldPatch, FormSchema, DEFAULT_FORM_NAME};

/// Key under which the in-progress draft is persisted.
pub const DRAFT_KEY: &str = "current_form_draft";

/// The form open in the editor.
#[derive(Debug, Clone)]
pub struct Workspace {
    id: Option<String>,
    name: String,
    fields: Arc<Vec<Field>>,
    inspected: Option<String>,
    /// Bumped on every mutation
    revision: u64,
    /// Bumped when a different schema replaces the current one
    generation: u64,
}

/// Serializable view of the editor.
#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub id: Option<String>,
    pub name: String,
    pub fields: Vec<Field>,
    pub status: &'static str,
    pub inspected: Option<String>,
    pub revision: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::from_draft(Draft::default())
    }
}

impl Workspace {
    pub fn from_draft(draft: Draft) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            fields: Arc::new(draft.fields),
            inspected: None,
            revision: 0,
            generation: 0,
        }
    }

    /// Restore the last persisted draft. Missing or corrupt drafts yield an empty one.
    pub async fn restore(kv: &KeyValueStore) -> Result<Self, AppError> {
        let Some(raw) = kv.get(DRAFT_KEY).await? else {
            return Ok(Self::default());
        };

        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) => {
                tracing::info!(fields = draft.fields.len(), "Restored draft {:?}", draft.name);
                Ok(Self::from_draft(draft))
            }
            Err(e) => {
                tracing::warn!("Discarding malformed draft: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Write the current snapshot to the key-value store.
    pub async fn persist(&self, kv: &KeyValueStore) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.snapshot())?;
        kv.set(DRAFT_KEY, &raw).await
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Arc<Vec<Field>> {
        &self.fields
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Draft {
        Draft {
            id: self.id.clone(),
            name: self.name.clone(),
            fields: self.fields.as_ref().clone(),
        }
    }

    pub fn view(&self) -> DraftView {
        DraftView {
            id: self.id().map(str::to_string),
            name: self.name.clone(),
            fields: self.fields.as_ref().clone(),
            status: if self.id.is_some() {
                "Editing saved form"
            } else {
                "Draft"
            },
            inspected: self.inspected.clone(),
            revision: self.revision,
        }
    }

    fn replace_fields(&mut self, next: Option<Vec<Field>>) -> bool {
        match next {
            Some(fields) => {
                self.fields = Arc::new(fields);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Append a field for a palette drop. Returns whether anything changed.
    pub fn drop_field(&mut self, payload: Option<&str>) -> bool {
        let next = builder::drop_field(&self.fields, payload);
        self.replace_fields(next)
    }

    pub fn move_field(&mut self, index: usize, direction: Direction) -> bool {
        let next = builder::move_field(&self.fields, index, direction);
        self.replace_fields(next)
    }

    pub fn remove_field(&mut self, index: usize) -> bool {
        let removed = self.fields.get(index).map(|f| f.id.clone());
        let next = builder::remove_field(&self.fields, index);
        let changed = self.replace_fields(next);
        if changed && self.inspected == removed {
            self.inspected = None;
        }
        changed
    }

    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> bool {
        let next = builder::update_field(&self.fields, id, patch);
        self.replace_fields(next)
    }

    /// Toggle the id panel for field `id`.
    pub fn toggle_inspect(&mut self, id: &str) {
        if self.inspected.as_deref() == Some(id) {
            self.inspected = None;
        } else if self.fields.iter().any(|f| f.id == id) {
            self.inspected = Some(id.to_string());
        }
        self.revision += 1;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.revision += 1;
    }

    /// Start a new, empty draft.
    pub fn reset(&mut self) {
        self.replace_schema(None, DEFAULT_FORM_NAME.to_string(), Vec::new());
    }

    /// Replace the editor contents with a saved form.
    pub fn load(&mut self, form: &FormSchema) {
        let name = if form.name.is_empty() {
            DEFAULT_FORM_NAME.to_string()
        } else {
            form.name.clone()
        };
        let id = (!form.id.is_empty()).then(|| form.id.clone());
        self.replace_schema(id, name, form.fields.clone());
    }

    fn replace_schema(&mut self, id: Option<String>, name: String, fields: Vec<Field>) {
        self.id = id;
        self.name = name;
        self.fields = Arc::new(fields);
        self.inspected = None;
        self.revision += 1;
        self.generation += 1;
    }

    /// Adopt the id assigned by a save, unless the editor has moved on to another schema.
    pub fn adopt_saved_id(&mut self, generation: u64, id: String) -> bool {
        if generation != self.generation {
            tracing::debug!("Editor changed during save; not adopting id {}", id);
            return false;
        }
        if self.id.as_deref() != Some(id.as_str()) {
            self.id = Some(id);
            self.revision += 1;
        }
        true
    }

    /// Turn the editor back into an unsaved draft if it shows the deleted form.
    pub fn detach_if(&mut self, deleted_id: &str) -> bool {
        if self.id.as_deref() == Some(deleted_id) {
            self.id = None;
            self.revision += 1;
            return true;
        }
        false
    }
}
