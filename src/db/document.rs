//! Document store abstraction
//!
//! Items and activity log entries live in a document database. The trait
//! keeps handlers independent of the backend: MongoDB in production, an
//! in-memory store for dev mode and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Item as returned to clients (identifier omitted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocItem {
    pub name: String,
    pub description: String,
}

/// Activity tags written to the log collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateSqlite,
    ReadSqlite,
    CreateMongo,
    ReadMongo,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateSqlite => "CREATE_SQLITE",
            Action::ReadSqlite => "READ_SQLITE",
            Action::CreateMongo => "CREATE_MONGO",
            Action::ReadMongo => "READ_MONGO",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One activity log entry
///
/// `action` stays a plain string so entries written by older deployments
/// with other tags still list cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// New entry stamped with the current time
    pub fn new(action: Action, details: impl Into<String>) -> Self {
        Self {
            action: action.as_str().to_string(),
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Backend-agnostic document store
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for health output ("mongodb", "memory")
    fn backend(&self) -> &'static str;

    /// Insert an item, returning its identifier as a hex string
    async fn create_item(&self, name: &str, description: &str) -> Result<String>;

    /// All items in insertion order
    async fn list_items(&self) -> Result<Vec<DocItem>>;

    /// Item by identifier; `InvalidId` if `id` does not parse, `None` if unassigned
    async fn get_item(&self, id: &str) -> Result<Option<DocItem>>;

    /// Append one entry to the log collection
    async fn append_log(&self, entry: &LogEntry) -> Result<()>;

    /// All log entries in insertion order
    async fn list_logs(&self) -> Result<Vec<LogEntry>>;
}

/// Parse a client-supplied identifier
pub fn parse_object_id(id: &str) -> Result<bson::oid::ObjectId> {
    bson::oid::ObjectId::parse_str(id)
        .map_err(|_| crate::types::ItemwayError::InvalidId(id.to_string()))
}
