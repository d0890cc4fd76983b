//! Backend configuration endpoints.

use axum::{extract::State, Json};

use super::{current_revision, error, success, ApiResult};
use crate::catalog::CatalogView;
use crate::config::BackendConfig;
use crate::AppState;

/// GET /api/backend - Current backend configuration, key masked.
pub async fn get_backend(State(state): State<AppState>) -> ApiResult<BackendConfig> {
    let revision = current_revision(&state).await;
    match BackendConfig::load(state.catalog.kv()).await {
        Ok(config) => success(config.masked(), revision),
        Err(e) => error(e, revision),
    }
}

/// PUT /api/backend - Save the backend configuration and re-list the catalog.
pub async fn put_backend(
    State(state): State<AppState>,
    Json(mut request): Json<BackendConfig>,
) -> ApiResult<CatalogView> {
    let revision = current_revision(&state).await;

    // Clients echo the masked key back when only the mode or url changed.
    if let Ok(current) = BackendConfig::load(state.catalog.kv()).await {
        if !request.key.is_empty() && request.key == current.masked().key {
            request.key = current.key;
        }
    }

    match state.catalog.configure(&request).await {
        Ok(()) => success(state.catalog.view().await, revision),
        Err(e) => error(e, revision),
    }
}
