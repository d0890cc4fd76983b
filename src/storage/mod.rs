//! Form storage backends.
//!
//! Both backends implement [`FormStore`]. [`open_store`] picks one from the backend
//! configuration on every call, so switching modes only changes where later calls land.

mod local;
mod remote;

pub use local::LocalFormStore;
pub use remote::RemoteFormStore;

#[cfg(test)]
pub(crate) use remote::fake;

use async_trait::async_trait;

use crate::config::{BackendConfig, BackendMode};
use crate::db::KeyValueStore;
use crate::errors::AppError;
use crate::models::FormSchema;

/// Capability contract shared by the local and remote stores.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    /// All saved forms, most recently updated first.
    async fn list(&self) -> Result<Vec<FormSchema>, AppError>;

    /// Insert or replace the form with the same id; returns the stored record.
    async fn upsert(&self, form: &FormSchema) -> Result<FormSchema, AppError>;

    /// Delete the form with `id`. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Build the store selected by `config`.
///
/// Remote mode without credentials fails here, before any request is made.
pub fn open_store(
    config: &BackendConfig,
    kv: &KeyValueStore,
    http: &reqwest::Client,
) -> Result<Box<dyn FormStore>, AppError> {
    match config.mode {
        BackendMode::Local => Ok(Box::new(LocalFormStore::new(kv.clone()))),
        BackendMode::Remote => {
            let credentials = config.credentials()?;
            Ok(Box::new(RemoteFormStore::new(http.clone(), credentials)))
        }
    }
}
