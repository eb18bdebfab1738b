//! In-process document store.
//!
//! Mirrors the REST store's create-or-merge PATCH: entries under `fields` are
//! merged into the stored document, creating it if absent. Non-object
//! documents are rejected rather than ignored.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Document store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<HashMap<(String, String), Value>>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a document wholesale, bypassing merge semantics.
    pub async fn put(&self, collection: &str, doc_id: &str, document: Value) {
        self.documents
            .write()
            .await
            .insert((collection.to_string(), doc_id.to_string()), document);
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn provider_name(&self) -> &'static str {
        "in-memory document store"
    }

    async fn get(&self, collection: &str, doc_id: &str) -> StoreResult<Option<Value>> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), doc_id.to_string()))
            .cloned())
    }

    async fn patch(&self, collection: &str, doc_id: &str, document: &Value) -> StoreResult<()> {
        debug!("Merging document {}/{}", collection, doc_id);

        let Some(incoming) = document.as_object() else {
            return Err(StoreError::InvalidDocument(format!(
                "{collection}/{doc_id}: expected an object"
            )));
        };

        let id = (collection.to_string(), doc_id.to_string());
        let mut documents = self.documents.write().await;
        let mut stored = match documents.remove(&id) {
            Some(Value::Object(existing)) => existing,
            _ => Map::new(),
        };

        for (key, value) in incoming {
            match (stored.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(update)) if key == "fields" => {
                    for (name, tagged) in update {
                        existing.insert(name.clone(), tagged.clone());
                    }
                }
                _ => {
                    stored.insert(key.clone(), value.clone());
                }
            }
        }

        documents.insert(id, Value::Object(stored));
        Ok(())
    }
}
