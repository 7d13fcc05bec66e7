//! Logging infrastructure for itemway
//!
//! Console logging goes through `tracing`; API activity is additionally
//! persisted to the document store's log collection.

pub mod activity;

pub use activity::ActivityLogger;
