//! Relational item endpoints
//!
//! - `POST /sqlite/items` - create an item
//! - `GET /sqlite/items` - list all items
//!
//! Diesel calls are blocking, so they run on the blocking thread pool.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use tracing::debug;

use super::items::{read_json, CreateItemRequest, CreatedResponse, NewItem};
use super::response;
use crate::db::Action;
use crate::server::AppState;
use crate::types::{ItemwayError, Result};

/// POST /sqlite/items
pub async fn create_item(state: &AppState, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
    let NewItem { name, description } = read_json::<CreateItemRequest>(req).await?.validate()?;

    let store = state.sqlite.clone();
    let (id, name) = tokio::task::spawn_blocking(move || {
        store.create_item(&name, &description).map(|id| (id, name))
    })
    .await
    .map_err(|e| ItemwayError::Internal(format!("SQLite task failed: {}", e)))??;

    debug!(id, name = %name, "SQLite item created");
    state
        .activity
        .record(Action::CreateSqlite, format!("Item '{}' added to SQLite.", name));

    Ok(response::created(&CreatedResponse {
        message: "SQLite item created!",
        id,
    }))
}

/// GET /sqlite/items
pub async fn list_items(state: &AppState) -> Result<Response<Full<Bytes>>> {
    let store = state.sqlite.clone();
    let items = tokio::task::spawn_blocking(move || store.list_items())
        .await
        .map_err(|e| ItemwayError::Internal(format!("SQLite task failed: {}", e)))??;

    state
        .activity
        .record(Action::ReadSqlite, "Fetched all items from SQLite.");

    Ok(response::ok(&items))
}
