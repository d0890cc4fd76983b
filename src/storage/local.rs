//! Local store: every saved form in one JSON array under a single key.

use async_trait::async_trait;
use serde_json::Value;

use super::FormStore;
use crate::db::KeyValueStore;
use crate::errors::AppError;
use crate::models::{sort_by_updated_desc, FormSchema};

/// Key holding the saved forms list.
pub const FORMS_KEY: &str = "formforge_forms_v1";

pub struct LocalFormStore {
    kv: KeyValueStore,
}

impl LocalFormStore {
    pub fn new(kv: KeyValueStore) -> Self {
        Self { kv }
    }

    /// Read the stored list. Corrupt data is discarded rather than reported.
    async fn read(&self) -> Result<Vec<FormSchema>, AppError> {
        let Some(raw) = self.kv.get(FORMS_KEY).await? else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) | Err(_) => {
                tracing::warn!("Discarding malformed local forms list");
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let forms: Vec<FormSchema> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if forms.len() != total {
            tracing::warn!(
                "Skipped {} malformed local form record(s)",
                total - forms.len()
            );
        }
        Ok(forms)
    }

    async fn write(&self, forms: &[FormSchema]) -> Result<(), AppError> {
        let raw = serde_json::to_string(forms)?;
        self.kv.set(FORMS_KEY, &raw).await
    }
}

#[async_trait]
impl FormStore for LocalFormStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn list(&self) -> Result<Vec<FormSchema>, AppError> {
        let mut forms = self.read().await?;
        sort_by_updated_desc(&mut forms);
        Ok(forms)
    }

    async fn upsert(&self, form: &FormSchema) -> Result<FormSchema, AppError> {
        let mut forms = self.list().await?;
        match forms.iter_mut().find(|f| f.id == form.id) {
            Some(existing) => *existing = form.clone(),
            None => forms.insert(0, form.clone()),
        }
        self.write(&forms).await?;

        tracing::debug!(id = %form.id, "Saved form locally");
        Ok(form.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut forms = self.list().await?;
        forms.retain(|f| f.id != id);
        self.write(&forms).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::create_field;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    async fn store() -> (LocalFormStore, KeyValueStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("kv.sqlite"))
            .await
            .unwrap();
        let kv = KeyValueStore::new(pool);
        (LocalFormStore::new(kv.clone()), kv, temp_dir)
    }

    fn form(id: &str, name: &str, minutes_ago: i64) -> FormSchema {
        FormSchema {
            id: id.to_string(),
            name: name.to_string(),
            fields: vec![create_field("text")],
            updated_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (store, _kv, _dir) = store().await;
        let saved = form("a", "Contact", 0);
        store.upsert(&saved).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
        assert_eq!(listed[0].name, saved.name);
        assert_eq!(listed[0].fields, saved.fields);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_list_sorts() {
        let (store, _kv, _dir) = store().await;
        store.upsert(&form("a", "First", 10)).await.unwrap();
        store.upsert(&form("b", "Second", 5)).await.unwrap();
        store.upsert(&form("a", "First again", 0)).await.unwrap();

        let listed = store.list().await.unwrap();
        let names: Vec<_> = listed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["First again", "Second"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _kv, _dir) = store().await;
        store.upsert(&form("a", "A", 1)).await.unwrap();
        store.upsert(&form("b", "B", 0)).await.unwrap();

        store.delete("a").await.unwrap();
        store.delete("missing").await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, ["b"]);
    }

    #[tokio::test]
    async fn test_malformed_state_falls_back_to_empty() {
        let (store, kv, _dir) = store().await;
        kv.set(FORMS_KEY, "{\"not\":\"an array\"}").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        kv.set(FORMS_KEY, "garbage").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        kv.set(FORMS_KEY, r#"[{"id":"ok","name":"Ok","fields":[]}, 42]"#)
            .await
            .unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "ok");
    }
}
