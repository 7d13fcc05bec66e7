//! itemway - item CRUD over two parallel stores
//!
//! Exposes the same item resource twice, once backed by SQLite and once by
//! MongoDB, and records every API action in an activity log kept in the
//! document store.
//!
//! ## Endpoints
//!
//! - `POST /sqlite/items`, `GET /sqlite/items`
//! - `POST /mongo/items`, `GET /mongo/items`, `GET /mongo/items/{id}`
//! - `GET /logs`
//! - `GET /health`

pub mod config;
pub mod db;
pub mod logging;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{ItemwayError, Result};
