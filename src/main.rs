//! FormForge
//!
//! Visual form builder service: compose fields, preview them live, and keep named form
//! schemas in a local SQLite-backed store or a remote REST datastore.

mod api;
mod builder;
mod catalog;
mod config;
mod db;
mod errors;
mod models;
mod preview;
mod storage;
mod workspace;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::Catalog;
use config::Config;
use db::KeyValueStore;
use preview::Preview;
use workspace::Workspace;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<RwLock<Workspace>>,
    pub preview: Arc<RwLock<Preview>>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Restore the last draft from `kv` and build the shared state.
    pub async fn restore(kv: KeyValueStore) -> Result<Self, errors::AppError> {
        let workspace = Workspace::restore(&kv).await?;
        let mut preview = Preview::default();
        preview.sync(workspace.generation());

        Ok(Self {
            workspace: Arc::new(RwLock::new(workspace)),
            preview: Arc::new(RwLock::new(preview)),
            catalog: Arc::new(Catalog::new(kv, reqwest::Client::new())),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FormForge");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize local storage
    let pool = db::init_database(&config.db_path).await?;
    let kv = KeyValueStore::new(pool);

    let state = AppState::restore(kv).await?;

    // Initial catalog listing; failures are shown in the catalog view
    if let Err(e) = state.catalog.refresh().await {
        tracing::warn!("Initial catalog listing failed: {}", e);
    } else {
        let view = state.catalog.view().await;
        tracing::info!("Catalog loaded with {} forms ({})", view.forms.len(), view.mode.as_str());
    }

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Builder
        .route("/palette", get(api::get_palette))
        .route("/draft", get(api::get_draft))
        .route("/draft/name", put(api::rename_draft))
        .route("/draft/reset", post(api::reset_draft))
        .route("/draft/fields", post(api::drop_field))
        .route(
            "/draft/fields/{field}",
            axum::routing::delete(api::remove_field).patch(api::update_field),
        )
        .route("/draft/fields/{field}/move", post(api::move_field))
        .route("/draft/fields/{field}/inspect", post(api::inspect_field))
        // Preview
        .route("/preview", get(api::get_preview))
        .route("/preview/values/{field}", put(api::set_preview_value))
        // Catalog
        .route("/forms", get(api::list_forms))
        .route("/forms/refresh", post(api::refresh_forms))
        .route("/forms/save", post(api::save_form))
        .route("/forms/{id}", axum::routing::delete(api::delete_form))
        .route("/forms/{id}/load", post(api::load_form))
        // Backend configuration
        .route("/backend", get(api::get_backend).put(api::put_backend));

    let page_routes = Router::new()
        .route("/preview", get(api::preview_page))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
