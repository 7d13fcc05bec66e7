//! Activity log endpoint
//!
//! `GET /logs` lists every entry in insertion order. Reading the log is not
//! itself logged.

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use super::response;
use crate::server::AppState;
use crate::types::Result;

/// GET /logs
pub async fn list_logs(state: &AppState) -> Result<Response<Full<Bytes>>> {
    let logs = state.documents.list_logs().await?;
    Ok(response::ok(&logs))
}
