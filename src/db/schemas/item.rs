//! Item document schema

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::document::DocItem;

/// Collection name for items
pub const ITEM_COLLECTION: &str = "items";

/// Item document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ItemDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub name: String,

    pub description: String,
}

impl ItemDoc {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            _id: None,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

impl From<ItemDoc> for DocItem {
    fn from(doc: ItemDoc) -> Self {
        DocItem {
            name: doc.name,
            description: doc.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_doc_omits_id() {
        let doc = bson::to_document(&ItemDoc::new("Chair", "Oak chair")).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("name").unwrap(), "Chair");
        assert_eq!(doc.get_str("description").unwrap(), "Oak chair");
    }

    #[test]
    fn test_into_client_item() {
        let mut stored = ItemDoc::new("Chair", "Oak chair");
        stored._id = Some(ObjectId::new());
        let item: DocItem = stored.into();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Chair", "description": "Oak chair"}));
    }
}
