//! HTTP routes for itemway

pub mod health;
pub mod items;
pub mod logs;
pub mod mongo;
pub mod response;
pub mod sqlite;

pub use health::health_check;
pub use logs::list_logs;
