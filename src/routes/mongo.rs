//! Document item endpoints
//!
//! - `POST /mongo/items` - create an item
//! - `GET /mongo/items` - list all items (identifier omitted)
//! - `GET /mongo/items/{id}` - fetch one item by ObjectId

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

/// POST /mongo/items
pub async fn create_item(state: &AppState, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
    let NewItem { name, description } = read_json::<CreateItemRequest>(req).await?.validate()?;

    let id = state.documents.create_item(&name, &description).await?;

    debug!(id = %id, name = %name, "Document item created");
    state
        .activity
        .record(Action::CreateMongo, format!("Item '{}' added to MongoDB.", name));

    Ok(response::created(&CreatedResponse {
        message: "MongoDB item created!",
        id,
    }))
}

/// GET /mongo/items
pub async fn list_items(state: &AppState) -> Result<Response<Full<Bytes>>> {
    let items = state.documents.list_items().await?;

    state
        .activity
        .record(Action::ReadMongo, "Fetched all items from MongoDB.");

    Ok(response::ok(&items))
}

/// GET /mongo/items/{id}
///
/// Malformed ids are a 400, unassigned ids a 404. Misses are not logged.
pub async fn get_item(state: &AppState, id: &str) -> Result<Response<Full<Bytes>>> {
    let item = state
        .documents
        .get_item(id)
        .await?
        .ok_or_else(|| ItemwayError::NotFound("Item not found".to_string()))?;

    state.activity.record(
        Action::ReadMongo,
        format!("Fetched item with ID {} from MongoDB.", id),
    );

    Ok(response::ok(&item))
}
