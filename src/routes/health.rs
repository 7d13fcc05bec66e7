//! Health check endpoint
//!
//! `GET /health` is a liveness probe: it always answers 200 while the
//! process is serving, and reports store status in the body.

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use serde::Serialize;
use tracing::warn;

use super::response;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when the relational store answers, otherwise "degraded"
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Seconds since the server state was created
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    pub sqlite: SqliteHealth,
    pub document_store: DocumentStoreHealth,
}

#[derive(Debug, Serialize)]
pub struct SqliteHealth {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DocumentStoreHealth {
    pub backend: &'static str,
}

/// GET /health
pub async fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    let store = state.sqlite.clone();
    let items = match tokio::task::spawn_blocking(move || store.item_count()).await {
        Ok(Ok(count)) => Some(count),
        Ok(Err(e)) => {
            warn!("Health check: SQLite unavailable: {}", e);
            None
        }
        Err(e) => {
            warn!("Health check: SQLite task failed: {}", e);
            None
        }
    };

    let body = HealthResponse {
        status: if items.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        sqlite: SqliteHealth {
            ok: items.is_some(),
            items,
        },
        document_store: DocumentStoreHealth {
            backend: state.documents.backend(),
        },
    };

    response::ok(&body)
}
