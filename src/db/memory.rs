//! In-memory document store
//!
//! Used in dev mode when no MongoDB is configured, and by tests. Items get
//! real ObjectIds so identifier parsing behaves exactly as with MongoDB.

use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::document::{parse_object_id, DocItem, DocumentStore, LogEntry};
use crate::types::Result;

#[derive(Default)]
pub struct MemoryDocumentStore {
    items: RwLock<Vec<(ObjectId, DocItem)>>,
    logs: RwLock<Vec<LogEntry>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_item(&self, name: &str, description: &str) -> Result<String> {
        let id = ObjectId::new();
        self.items.write().await.push((
            id,
            DocItem {
                name: name.to_string(),
                description: description.to_string(),
            },
        ));
        Ok(id.to_hex())
    }

    async fn list_items(&self) -> Result<Vec<DocItem>> {
        Ok(self.items.read().await.iter().map(|(_, item)| item.clone()).collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<DocItem>> {
        let oid = parse_object_id(id)?;
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|(stored, _)| *stored == oid)
            .map(|(_, item)| item.clone()))
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.logs.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        Ok(self.logs.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::document::Action;
    use crate::types::ItemwayError;

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let store = MemoryDocumentStore::new();
        let id = store.create_item("Chair", "Oak chair").await.unwrap();

        let item = store.get_item(&id).await.unwrap().unwrap();
        assert_eq!(item.name, "Chair");
        assert_eq!(item.description, "Oak chair");
    }

    #[tokio::test]
    async fn test_unassigned_and_malformed_ids() {
        let store = MemoryDocumentStore::new();
        store.create_item("Chair", "Oak chair").await.unwrap();

        let unassigned = ObjectId::new().to_hex();
        assert!(store.get_item(&unassigned).await.unwrap().is_none());

        let err = store.get_item("not-an-id").await.unwrap_err();
        assert!(matches!(err, ItemwayError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryDocumentStore::new();
        for name in ["a", "b", "c"] {
            store.create_item(name, "x").await.unwrap();
        }
        store.append_log(&LogEntry::new(Action::CreateMongo, "first")).await.unwrap();
        store.append_log(&LogEntry::new(Action::ReadMongo, "second")).await.unwrap();

        let names: Vec<String> = store.list_items().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let details: Vec<String> = store.list_logs().await.unwrap().into_iter().map(|l| l.details).collect();
        assert_eq!(details, vec!["first", "second"]);
    }
}
