//! HTTP server and shared state

pub mod http;

pub use http::{run, serve, AppState};
