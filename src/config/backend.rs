//! Storage backend selection, persisted in the local key-value store.

use serde::{Deserialize, Serialize};

use crate::db::KeyValueStore;
use crate::errors::AppError;

/// Key under which the backend configuration is persisted.
pub const BACKEND_CONFIG_KEY: &str = "formforge_backend_cfg_v1";

/// Which store services catalog operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Local,
    #[serde(alias = "supabase")]
    Remote,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Local => "local",
            BackendMode::Remote => "remote",
        }
    }
}

/// Backend configuration as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
}

/// Validated remote connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    /// Project URL without trailing slash
    pub base_url: String,
    pub key: String,
}

impl BackendConfig {
    /// Read the persisted configuration, falling back to local mode when absent or corrupt.
    pub async fn load(kv: &KeyValueStore) -> Result<Self, AppError> {
        let Some(raw) = kv.get(BACKEND_CONFIG_KEY).await? else {
            return Ok(Self::default());
        };

        match serde_json::from_str(&raw) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Discarding malformed backend configuration: {}", e);
                kv.remove(BACKEND_CONFIG_KEY).await?;
                Ok(Self::default())
            }
        }
    }

    /// Persist this configuration.
    pub async fn save(&self, kv: &KeyValueStore) -> Result<(), AppError> {
        let raw = serde_json::to_string(self)?;
        kv.set(BACKEND_CONFIG_KEY, &raw).await
    }

    /// Remote credentials, or a configuration error if either is missing.
    pub fn credentials(&self) -> Result<RemoteCredentials, AppError> {
        let url = self.url.trim();
        let key = self.key.trim();

        if url.is_empty() || key.is_empty() {
            return Err(AppError::Config(
                "Remote store not configured: url and key are required".to_string(),
            ));
        }

        Ok(RemoteCredentials {
            base_url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    /// Copy safe to hand back to clients.
    pub fn masked(&self) -> Self {
        let key = if self.key.is_empty() {
            String::new()
        } else {
            let tail: String = self
                .key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{}", tail)
        };

        Self {
            mode: self.mode,
            url: self.url.clone(),
            key,
        }
    }
}
