//! REST document store client.
//!
//! Talks to `{base}/{collection}/{docId}.json?key={apiKey}`.

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, StoreConfig};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// Document store reached over HTTP.
pub struct RestDocumentStore {
    config: StoreConfig,
    client: Client,
}

impl RestDocumentStore {
    /// Creates a new client.
    ///
    /// No request timeout is configured; callers impose their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(StoreError::Config("store base URL is empty".to_string()));
        }

        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(collection),
            urlencoding::encode(doc_id)
        )
    }

    async fn rejected(response: Response) -> StoreError {
        let status = response.status().as_u16();
        warn!("Document store rejected request with status {}", status);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read rejected response body: {}", e);
                e.to_string()
            }
        };
        StoreError::Rejected { status, body }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    fn provider_name(&self) -> &'static str {
        "REST document store"
    }

    async fn get(&self, collection: &str, doc_id: &str) -> StoreResult<Option<Value>> {
        debug!("Fetching document {}/{}", collection, doc_id);

        let response = self
            .client
            .get(self.document_url(collection, doc_id))
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document {}/{} not found", collection, doc_id);
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body)? {
            Value::Null => Ok(None),
            document => Ok(Some(document)),
        }
    }

    async fn patch(&self, collection: &str, doc_id: &str, document: &Value) -> StoreResult<()> {
        debug!("Patching document {}/{}", collection, doc_id);

        let response = self
            .client
            .patch(self.document_url(collection, doc_id))
            .query(&[("key", self.config.api_key.as_str())])
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        Ok(())
    }
}
