//! Forms catalog: lists, saves, deletes and loads forms through the active store.
//!
//! Every operation reads the backend configuration fresh, records its own failure in the
//! catalog view and leaves the editor and the displayed list otherwise untouched.
//! Listings carry a request token; a listing that finishes after a newer one was issued
//! is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::{BackendConfig, BackendMode};
use crate::db::KeyValueStore;
use crate::errors::AppError;
use crate::models::FormSchema;
use crate::storage::{open_store, FormStore};
use crate::workspace::Workspace;

/// What the catalog panel shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogView {
    pub forms: Vec<FormSchema>,
    pub error: Option<String>,
    pub loading: bool,
    pub mode: BackendMode,
    #[serde(skip)]
    in_flight: usize,
}

pub struct Catalog {
    kv: KeyValueStore,
    http: reqwest::Client,
    view: RwLock<CatalogView>,
    issued: AtomicU64,
}

impl Catalog {
    pub fn new(kv: KeyValueStore, http: reqwest::Client) -> Self {
        Self {
            kv,
            http,
            view: RwLock::new(CatalogView::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn kv(&self) -> &KeyValueStore {
        &self.kv
    }

    pub async fn view(&self) -> CatalogView {
        self.view.read().await.clone()
    }

    /// Look up a form in the displayed catalog.
    pub async fn find(&self, id: &str) -> Option<FormSchema> {
        self.view
            .read()
            .await
            .forms
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// Open the store selected by the current configuration.
    async fn store(&self) -> Result<Box<dyn FormStore>, AppError> {
        let config = BackendConfig::load(&self.kv).await?;
        self.view.write().await.mode = config.mode;
        let store = open_store(&config, &self.kv, &self.http)?;
        tracing::debug!(backend = store.backend(), "Using form store");
        Ok(store)
    }

    async fn begin(&self) {
        let mut view = self.view.write().await;
        view.in_flight += 1;
        view.loading = true;
        view.error = None;
    }

    async fn end(&self, error: Option<&AppError>) {
        let mut view = self.view.write().await;
        view.in_flight = view.in_flight.saturating_sub(1);
        view.loading = view.in_flight > 0;
        if let Some(err) = error {
            view.error = Some(err.message());
        }
    }

    /// Re-list the catalog from the active store.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.begin().await;

        let result = match self.store().await {
            Ok(store) => store.list().await,
            Err(e) => Err(e),
        };

        // Token check and write share one guard.
        let mut view = self.view.write().await;
        view.in_flight = view.in_flight.saturating_sub(1);
        view.loading = view.in_flight > 0;

        let latest = self.issued.load(Ordering::SeqCst);
        if token != latest {
            tracing::debug!(token, latest, "Dropping stale catalog listing");
            return result.map(|_| ());
        }

        match result {
            Ok(forms) => {
                tracing::debug!(count = forms.len(), "Catalog refreshed");
                view.forms = forms;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load forms: {}", e);
                view.error = Some(e.message());
                Err(e)
            }
        }
    }

    /// Save the editor's form, adopt its id and re-list.
    pub async fn save(&self, workspace: &RwLock<Workspace>) -> Result<FormSchema, AppError> {
        let (draft, generation) = {
            let ws = workspace.read().await;
            (ws.snapshot(), ws.generation())
        };

        self.begin().await;

        if draft.name.is_empty() {
            let err = AppError::Validation("Form name is required".to_string());
            self.end(Some(&err)).await;
            return Err(err);
        }

        let record = FormSchema {
            id: draft
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: draft.name,
            fields: draft.fields,
            updated_at: Some(Utc::now()),
        };

        let result = match self.store().await {
            Ok(store) => store.upsert(&record).await,
            Err(e) => Err(e),
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Failed to save form {}: {}", record.id, e);
                self.end(Some(&e)).await;
                return Err(e);
            }
        };
        self.end(None).await;
        tracing::info!(id = %saved.id, name = %saved.name, "Form saved");

        {
            let mut ws = workspace.write().await;
            if ws.adopt_saved_id(generation, saved.id.clone()) {
                ws.persist(&self.kv).await?;
            }
        }

        // A failed re-list is recorded in the view; the save itself stands.
        let _ = self.refresh().await;
        Ok(saved)
    }

    /// Delete a saved form. The editor becomes an unsaved draft if it showed that form.
    pub async fn delete(&self, id: &str, workspace: &RwLock<Workspace>) -> Result<(), AppError> {
        self.begin().await;

        let result = match self.store().await {
            Ok(store) => store.delete(id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to delete form {}: {}", id, e);
            self.end(Some(&e)).await;
            return Err(e);
        }
        self.end(None).await;
        tracing::info!(id, "Form deleted");

        {
            let mut ws = workspace.write().await;
            if ws.detach_if(id) {
                ws.persist(&self.kv).await?;
            }
        }

        let _ = self.refresh().await;
        Ok(())
    }

    /// Replace the editor contents with `form`.
    pub async fn load(
        &self,
        form: &FormSchema,
        workspace: &RwLock<Workspace>,
    ) -> Result<(), AppError> {
        let mut ws = workspace.write().await;
        ws.load(form);
        ws.persist(&self.kv).await?;
        tracing::info!(id = %form.id, "Form loaded into editor");
        Ok(())
    }

    /// Persist a new backend configuration and re-list from the store it selects.
    pub async fn configure(&self, config: &BackendConfig) -> Result<(), AppError> {
        config.save(&self.kv).await?;
        self.view.write().await.mode = config.mode;
        tracing::info!(mode = config.mode.as_str(), "Backend configuration saved");

        // Listing failures are shown in the catalog view.
        let _ = self.refresh().await;
        Ok(())
    }
}
