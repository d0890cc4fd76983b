//! Catalog endpoints.

use axum::extract::{Path, State};

use super::{current_revision, error, success, ApiResult};
use crate::catalog::CatalogView;
use crate::errors::AppError;
use crate::models::FormSchema;
use crate::workspace::DraftView;
use crate::AppState;

/// GET /api/forms - The catalog as currently displayed.
pub async fn list_forms(State(state): State<AppState>) -> ApiResult<CatalogView> {
    success(state.catalog.view().await, current_revision(&state).await)
}

/// POST /api/forms/refresh - Re-list from the active store.
pub async fn refresh_forms(State(state): State<AppState>) -> ApiResult<CatalogView> {
    let result = state.catalog.refresh().await;
    let revision = current_revision(&state).await;

    match result {
        Ok(()) => success(state.catalog.view().await, revision),
        Err(e) => error(e, revision),
    }
}

/// POST /api/forms/save - Save the open draft.
pub async fn save_form(State(state): State<AppState>) -> ApiResult<FormSchema> {
    let result = state.catalog.save(&state.workspace).await;
    let revision = current_revision(&state).await;

    match result {
        Ok(saved) => success(saved, revision),
        Err(e) => error(e, revision),
    }
}

/// DELETE /api/forms/:id - Delete a saved form.
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CatalogView> {
    let result = state.catalog.delete(&id, &state.workspace).await;
    let revision = current_revision(&state).await;

    match result {
        Ok(()) => success(state.catalog.view().await, revision),
        Err(e) => error(e, revision),
    }
}

/// POST /api/forms/:id/load - Open a catalog entry in the editor.
pub async fn load_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DraftView> {
    let Some(form) = state.catalog.find(&id).await else {
        return error(
            AppError::NotFound(format!("Form {} not found", id)),
            current_revision(&state).await,
        );
    };

    if let Err(e) = state.catalog.load(&form, &state.workspace).await {
        return error(e, current_revision(&state).await);
    }

    let ws = state.workspace.read().await;
    success(ws.view(), ws.revision())
}
