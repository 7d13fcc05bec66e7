//! Shared error type for itemway

use hyper::StatusCode;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ItemwayError>;

#[derive(Error, Debug)]
pub enum ItemwayError {
    #[error("{0}")]
    Validation(String),

    #[error("'{0}' is not a valid ObjectId, it must be a 12-byte input or a 24-character hex string")]
    InvalidId(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ItemwayError {
    /// HTTP status this error maps to at the dispatcher boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItemwayError::Validation(_) | ItemwayError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ItemwayError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ItemwayError::Validation("Missing required field: name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ItemwayError::InvalidId("not-an-id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ItemwayError::NotFound("Item not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ItemwayError::Database("connection refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ItemwayError::Config("MONGODB_URI is not set".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_error_is_server_error() {
        let err: ItemwayError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("IO error:"));
    }

    #[test]
    fn test_not_found_message_is_bare() {
        let err = ItemwayError::NotFound("Item not found".into());
        assert_eq!(err.to_string(), "Item not found");
    }
}
