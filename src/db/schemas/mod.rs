//! MongoDB document schemas
//!
//! Defines the stored shape of items and activity log entries.

mod item;
mod log_entry;

pub use item::{ItemDoc, ITEM_COLLECTION};
pub use log_entry::{LogDoc, LOG_COLLECTION};
