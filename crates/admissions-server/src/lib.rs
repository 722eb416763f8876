//! HTTP surface for the hospital admissions backend.
//!
//! # Routes
//!
//! - `/admin/...`: admissions, doctors, patients, visitors, totals and reports
//! - `/admission/...`: new and returning patient intake
//! - `/patient/...`: patient login, details, password, history and visitors
//! - `/doctor/...`: doctor login, ward list and clinical notes
//! - `/health`: liveness check
//!
//! Handlers lock the shared [`Database`] for the duration of one synchronous
//! service call and never hold the lock across an `.await`.

pub mod config;
pub mod error;
mod routes;

use std::sync::{Arc, Mutex, MutexGuard};

use admissions_core::Database;
use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use crate::config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Lock the database for one unit of work.
    pub(crate) fn db(&self) -> ApiResult<MutexGuard<'_, Database>> {
        Ok(self.db.lock()?)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/admin", routes::admin::routes())
        .nest("/admission", routes::admission::routes())
        .nest("/patient", routes::patient::routes())
        .nest("/doctor", routes::doctor::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Open the configured database and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let db = Database::open_with_timeout(&config.database_path, config.busy_timeout())
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    let addr = config.socket_addr()?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, database = %config.database_path.display(), "admissions server listening");

    axum::serve(listener, router(AppState::new(db)))
        .await
        .context("Server error")
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
