//! Preview endpoints.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::preview::{html, InputValue, PreviewView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub value: InputValue,
}

/// GET /api/preview - Controls for the current draft.
pub async fn get_preview(State(state): State<AppState>) -> ApiResult<PreviewView> {
    let ws = state.workspace.read().await;
    let mut preview = state.preview.write().await;
    preview.sync(ws.generation());
    success(preview.view(ws.fields()), ws.revision())
}

/// PUT /api/preview/values/:field_id - Enter a value into a preview control.
pub async fn set_preview_value(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(request): Json<SetValueRequest>,
) -> ApiResult<PreviewView> {
    let ws = state.workspace.read().await;
    let mut preview = state.preview.write().await;
    preview.sync(ws.generation());
    preview.set_value(field_id, request.value);
    success(preview.view(ws.fields()), ws.revision())
}

/// GET /preview - The preview rendered as an HTML page.
pub async fn preview_page(State(state): State<AppState>) -> Html<String> {
    let ws = state.workspace.read().await;
    let mut preview = state.preview.write().await;
    preview.sync(ws.generation());
    Html(html::render_page(ws.name(), &preview.view(ws.fields())))
}
