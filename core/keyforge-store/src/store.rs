//! Document store abstraction trait.
//!
//! Defines the two round trips the license service needs from a store.

use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Connection settings for the remote document store.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the document API (e.g. `https://example.firebaseio.com`).
    pub base_url: String,
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Abstract document store interface.
///
/// Documents are addressed by collection name and document id, and carried as
/// tagged-value wrappers (see [`crate::codec`]).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a short name for logging.
    fn provider_name(&self) -> &'static str;

    /// Fetches a document. Returns `None` if the store has no such document.
    async fn get(&self, collection: &str, doc_id: &str) -> StoreResult<Option<Value>>;

    /// Creates the document or merges `document` into it.
    async fn patch(&self, collection: &str, doc_id: &str, document: &Value) -> StoreResult<()>;
}
