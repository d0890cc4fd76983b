//! Builder endpoints operating on the open draft.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::builder::Direction;
use crate::models::FieldPatch;
use crate::workspace::{DraftView, Workspace};
use crate::AppState;

/// Request body for a palette drop.
#[derive(Debug, Deserialize)]
pub struct DropRequest {
    /// Palette type carried by the drag payload
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Apply `edit` to the draft and persist it if anything changed.
async fn edit_draft<F>(state: &AppState, edit: F) -> ApiResult<DraftView>
where
    F: FnOnce(&mut Workspace) -> bool,
{
    let mut ws = state.workspace.write().await;
    if edit(&mut *ws) {
        if let Err(e) = ws.persist(state.catalog.kv()).await {
            return error(e, ws.revision());
        }
    }
    success(ws.view(), ws.revision())
}

/// GET /api/draft - The form open in the editor.
pub async fn get_draft(State(state): State<AppState>) -> ApiResult<DraftView> {
    let ws = state.workspace.read().await;
    success(ws.view(), ws.revision())
}

/// PUT /api/draft/name - Rename the open form.
pub async fn rename_draft(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> ApiResult<DraftView> {
    edit_draft(&state, |ws| {
        ws.rename(request.name);
        true
    })
    .await
}

/// POST /api/draft/reset - Start a new, empty form.
pub async fn reset_draft(State(state): State<AppState>) -> ApiResult<DraftView> {
    tracing::info!("Starting new draft");
    edit_draft(&state, |ws| {
        ws.reset();
        true
    })
    .await
}

/// POST /api/draft/fields - Drop a palette component onto the canvas.
pub async fn drop_field(
    State(state): State<AppState>,
    Json(request): Json<DropRequest>,
) -> ApiResult<DraftView> {
    edit_draft(&state, |ws| {
        let added = ws.drop_field(request.kind.as_deref());
        if !added {
            tracing::debug!("Ignoring drop with payload {:?}", request.kind);
        }
        added
    })
    .await
}

/// POST /api/draft/fields/:index/move - Move a field one step up or down.
pub async fn move_field(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<DraftView> {
    edit_draft(&state, |ws| ws.move_field(index, request.direction)).await
}

/// DELETE /api/draft/fields/:index - Remove a field.
pub async fn remove_field(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<DraftView> {
    edit_draft(&state, |ws| ws.remove_field(index)).await
}

/// PATCH /api/draft/fields/:id - Merge attributes into a field.
pub async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<FieldPatch>,
) -> ApiResult<DraftView> {
    edit_draft(&state, |ws| ws.update_field(&id, &patch)).await
}

/// POST /api/draft/fields/:id/inspect - Toggle the field id panel.
pub async fn inspect_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DraftView> {
    let mut ws = state.workspace.write().await;
    ws.toggle_inspect(&id);
    success(ws.view(), ws.revision())
}
