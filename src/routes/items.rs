//! Request body handling shared by both item stores

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{ItemwayError, Result};

/// Body of `POST /sqlite/items` and `POST /mongo/items`
///
/// Fields are optional here so a missing field becomes a 400 with a
/// precise message instead of a generic parse error.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated create input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
}

impl CreateItemRequest {
    pub fn validate(self) -> Result<NewItem> {
        Ok(NewItem {
            name: required("name", self.name)?,
            description: required("description", self.description)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(ItemwayError::Validation(format!(
            "Missing required field: {}",
            field
        ))),
        Some(v) if v.trim().is_empty() => Err(ItemwayError::Validation(format!(
            "Field '{}' must not be empty",
            field
        ))),
        Some(v) => Ok(v),
    }
}

/// Response body for a successful create
#[derive(Debug, Serialize)]
pub struct CreatedResponse<Id: Serialize> {
    pub message: &'static str,
    pub id: Id,
}

/// Read and parse a JSON request body
pub async fn read_json<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
    let body = req
        .collect()
        .await
        .map_err(|e| ItemwayError::Validation(format!("Failed to read request body: {}", e)))?
        .to_bytes();

    serde_json::from_slice(&body)
        .map_err(|e| ItemwayError::Validation(format!("Invalid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NewItem> {
        serde_json::from_str::<CreateItemRequest>(json).unwrap().validate()
    }

    #[test]
    fn test_valid_request() {
        let item = parse(r#"{"name": "Widget", "description": "A small widget"}"#).unwrap();
        assert_eq!(
            item,
            NewItem {
                name: "Widget".to_string(),
                description: "A small widget".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields() {
        let err = parse(r#"{"description": "no name"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");

        let err = parse(r#"{"name": "no description"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: description");
    }

    #[test]
    fn test_blank_field_rejected() {
        let err = parse(r#"{"name": "   ", "description": "x"}"#).unwrap_err();
        assert!(matches!(err, ItemwayError::Validation(_)));
    }

    #[test]
    fn test_extra_fields_ignored() {
        assert!(parse(r#"{"name": "a", "description": "b", "price": 3}"#).is_ok());
    }
}
