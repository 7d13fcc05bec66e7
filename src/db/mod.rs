//! Storage adapters
//!
//! ## Relational store
//!
//! - `sqlite` - `item(id, name, description)` via Diesel over an r2d2 pool
//!
//! ## Document store
//!
//! - `document` - the `DocumentStore` trait and client-facing types
//! - `mongo` - MongoDB implementation (`items` and `logs` collections)
//! - `memory` - in-memory implementation for dev mode and tests

pub mod diesel_schema;
pub mod document;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod schemas;
pub mod sqlite;

pub use document::{Action, DocItem, DocumentStore, LogEntry};
pub use memory::MemoryDocumentStore;
pub use models::SqlItem;
pub use mongo::{MongoClient, MongoDocumentStore};
pub use sqlite::SqliteStore;
