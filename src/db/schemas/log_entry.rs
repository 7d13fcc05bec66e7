//! Activity log document schema
//!
//! Timestamps are stored as BSON dates, not strings.

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::db::document::LogEntry;

/// Collection name for activity logs
pub const LOG_COLLECTION: &str = "logs";

/// Log document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub action: String,

    pub details: String,

    pub timestamp: DateTime,
}

impl From<&LogEntry> for LogDoc {
    fn from(entry: &LogEntry) -> Self {
        Self {
            _id: None,
            action: entry.action.clone(),
            details: entry.details.clone(),
            timestamp: DateTime::from_chrono(entry.timestamp),
        }
    }
}

impl From<LogDoc> for LogEntry {
    fn from(doc: LogDoc) -> Self {
        LogEntry {
            action: doc.action,
            details: doc.details,
            timestamp: doc.timestamp.to_chrono(),
        }
    }
}
