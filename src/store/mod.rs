use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::StoreConfig;
use crate::stats::StatsSnapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No shared stats found for id {0}")]
    NotFound(String),

    #[error("Document store request failed: {status}")]
    Status { status: StatusCode },

    #[error("Document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Document store is not configured; set store.base_url in .statcard.toml or STATCARD_STORE_URL")]
    NotConfigured,
}

/// Write-one/read-one access to snapshots in a hosted document store.
///
/// Snapshots are immutable once written and addressed by an opaque
/// store-generated identifier. There is no update, no delete, and no
/// access control: any identifier holder can read. That is the accepted
/// tradeoff for a public share-card feature, not an oversight.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Store the snapshot verbatim and return its identifier.
    async fn write(&self, snapshot: &StatsSnapshot) -> Result<String, StoreError>;

    /// Fetch a snapshot back by identifier.
    async fn read(&self, id: &str) -> Result<StatsSnapshot, StoreError>;
}

/// Snapshot store speaking plain JSON-over-HTTP to a hosted document
/// database: POST a document into a collection, GET it back by id.
#[derive(Debug)]
pub struct HttpDocumentStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    id: String,
}

impl HttpDocumentStore {
    /// Build a store from configuration. Sharing is an opt-in feature,
    /// so an unset endpoint is an error here, not a default.
    pub fn from_config(config: &StoreConfig) -> Result<HttpDocumentStore, StoreError> {
        let base_url = config.base_url.as_deref().ok_or(StoreError::NotConfigured)?;
        Ok(HttpDocumentStore {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: config.collection().to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("X-Api-Key", key),
            None => builder,
        }
    }
}

#[async_trait]
impl SnapshotStore for HttpDocumentStore {
    #[instrument(skip(self, snapshot), fields(username = %snapshot.username))]
    async fn write(&self, snapshot: &StatsSnapshot) -> Result<String, StoreError> {
        debug!("writing snapshot to document store");
        let response = self
            .request(self.http.post(self.collection_url()))
            .json(snapshot)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status { status });
        }

        let created = response.json::<CreatedDocument>().await?;
        debug!(id = %created.id, "snapshot stored");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: &str) -> Result<StatsSnapshot, StoreError> {
        debug!("reading snapshot from document store");
        let response = self
            .request(self.http.get(self.document_url(id)))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Status { status });
        }

        let snapshot = response.json::<StatsSnapshot>().await?;
        Ok(snapshot)
    }
}
