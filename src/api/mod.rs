//! REST API module.
//!
//! Contains the routes and handlers behind the builder, preview and catalog panels.

mod backend;
mod draft;
mod forms;
mod preview;

pub use backend::*;
pub use draft::*;
pub use forms::*;
pub use preview::*;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::builder::{PaletteEntry, PALETTE};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision: u64) -> Self {
        Self {
            success: true,
            data,
            revision,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision: u64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: crate::errors::AppError, revision: u64) -> ApiResult<T> {
    Err(crate::errors::AppErrorWithRevision {
        error: err,
        revision,
    })
}

/// Current editor revision, reported with every response.
pub(crate) async fn current_revision(state: &AppState) -> u64 {
    state.workspace.read().await.revision()
}

/// GET /api/palette - Components that can be dropped onto the canvas.
pub async fn get_palette(State(state): State<AppState>) -> ApiResult<Vec<PaletteEntry>> {
    success(PALETTE.to_vec(), current_revision(&state).await)
}
