//! MongoDB client and collection wrapper
//!
//! One `Client` is created at startup and shared for the process lifetime;
//! the driver pools connections internally.

use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::db::document::{parse_object_id, DocItem, DocumentStore, LogEntry};
use crate::db::schemas::{ItemDoc, LogDoc, ITEM_COLLECTION, LOG_COLLECTION};
use crate::types::{ItemwayError, Result};

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the server answers a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        // Fail fast instead of hanging on an unreachable server
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| ItemwayError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ItemwayError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub fn collection<T>(&self, name: &str) -> MongoCollection<T>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync,
    {
        MongoCollection {
            inner: self.client.database(&self.db_name).collection::<T>(name),
        }
    }
}

/// Typed MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    /// Insert a document and return its generated ID
    pub async fn insert_one(&self, item: T) -> Result<ObjectId> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| ItemwayError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ItemwayError::Database("Failed to get inserted ID".into()))
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| ItemwayError::Database(format!("Find failed: {}", e)))
    }

    /// Every document in `_id` order
    ///
    /// Fails if any stored document does not decode as `T`.
    pub async fn find_all(&self) -> Result<Vec<T>> {
        let raw: Vec<Document> = self
            .inner
            .clone_with_type::<Document>()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| ItemwayError::Database(format!("Find failed: {}", e)))?
            .try_collect()
            .await
            .map_err(|e| ItemwayError::Database(format!("Cursor failed: {}", e)))?;

        decode_documents(self.inner.name(), raw)
    }
}

fn decode_documents<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Result<Vec<T>> {
    docs.into_iter()
        .map(|d| {
            let id = d
                .get("_id")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "<no _id>".to_string());
            bson::from_document(d).map_err(|e| {
                ItemwayError::Database(format!(
                    "Document {} in '{}' does not match the expected shape: {}",
                    id, collection, e
                ))
            })
        })
        .collect()
}

/// `DocumentStore` backed by the `items` and `logs` collections
pub struct MongoDocumentStore {
    items: MongoCollection<ItemDoc>,
    logs: MongoCollection<LogDoc>,
}

impl MongoDocumentStore {
    pub fn new(client: &MongoClient) -> Self {
        Self {
            items: client.collection(ITEM_COLLECTION),
            logs: client.collection(LOG_COLLECTION),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn create_item(&self, name: &str, description: &str) -> Result<String> {
        let id = self.items.insert_one(ItemDoc::new(name, description)).await?;
        Ok(id.to_hex())
    }

    async fn list_items(&self) -> Result<Vec<DocItem>> {
        let docs = self.items.find_all().await?;
        Ok(docs.into_iter().map(DocItem::from).collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<DocItem>> {
        let oid = parse_object_id(id)?;
        let doc = self.items.find_one(doc! { "_id": oid }).await?;
        Ok(doc.map(DocItem::from))
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.logs.insert_one(LogDoc::from(entry)).await?;
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let docs = self.logs.find_all().await?;
        Ok(docs.into_iter().map(LogEntry::from).collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_documents_in_order() {
        let docs = vec![
            doc! { "_id": ObjectId::new(), "name": "Chair", "description": "Oak chair" },
            doc! { "_id": ObjectId::new(), "name": "Table", "description": "Pine table" },
        ];
        let items: Vec<ItemDoc> = decode_documents(ITEM_COLLECTION, docs).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Chair", "Table"]);
    }

    #[test]
    fn test_mismatched_document_fails_listing() {
        let bad_id = ObjectId::new();
        let docs = vec![
            doc! { "_id": ObjectId::new(), "name": "Chair", "description": "Oak chair" },
            doc! { "_id": bad_id, "name": 42, "description": "numeric name" },
        ];

        let err = decode_documents::<ItemDoc>(ITEM_COLLECTION, docs).unwrap_err();
        assert!(matches!(err, ItemwayError::Database(_)));
        let message = err.to_string();
        assert!(message.contains("items"));
        assert!(message.contains(&bad_id.to_hex()));
    }

    #[test]
    fn test_log_without_timestamp_fails_listing() {
        let docs = vec![doc! { "action": "CREATE_MONGO", "details": "legacy entry" }];
        let err = decode_documents::<LogDoc>(LOG_COLLECTION, docs).unwrap_err();
        assert!(err.to_string().contains("<no _id>"));
    }
}
