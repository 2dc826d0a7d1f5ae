//! HTTP client for a remote object-storage backend
//!
//! Objects live at `{base_url}/{resource}/{folder}/{file}`. Each request
//! carries the scoped credential as a bearer token; authorization is
//! enforced by the remote side, which shares the signing key with the
//! gateway's credential authority.

use crate::{ObjectKey, ObjectStore, Result, ScopedCredential, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::instrument;

/// Configuration for the remote object store connection
#[derive(Clone)]
pub struct HttpStoreConfig {
    /// Backend base URL (e.g. "http://localhost:7070")
    pub base_url: String,
    /// Storage resource (bucket) name under the base URL
    pub resource: String,
    /// Per-call request timeout
    pub timeout: Duration,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7070".to_string(),
            resource: "filegate".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpStoreConfig {
    /// Create with a custom base URL and resource
    pub fn with_backend(base_url: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource: resource.into(),
            ..Default::default()
        }
    }
}

/// Remote object store client
#[derive(Clone)]
pub struct HttpObjectStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpObjectStore {
    /// Create a new remote store client and verify the backend is reachable
    pub async fn new(config: HttpStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        let store = Self { client, config };
        store.verify_connection().await?;

        Ok(store)
    }

    /// Create from URL and resource strings with default settings
    pub async fn connect(base_url: &str, resource: &str) -> Result<Self> {
        Self::new(HttpStoreConfig::with_backend(base_url, resource)).await
    }

    /// Verify the backend answers at all; any HTTP status counts as alive
    pub async fn verify_connection(&self) -> Result<()> {
        self.client
            .head(&self.config.base_url)
            .send()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("failed to reach storage backend: {}", e))
            })?;
        Ok(())
    }

    fn object_url(&self, key: &ObjectKey) -> String {
        // Segments are encoded so names with spaces or reserved characters
        // survive the trip; the key invariant already excludes separators.
        format!(
            "{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.resource),
            urlencoding::encode(key.folder()),
            urlencoding::encode(key.file()),
        )
    }

    fn check_denied(status: StatusCode, body: &str) -> Option<StoreError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Some(StoreError::AccessDenied(format!(
                "backend rejected credential: {} {}",
                status, body
            )))
        } else {
            None
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    #[instrument(skip(self, data, credential), fields(key = %key, size = data.len()))]
    async fn put_object(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Bytes,
        credential: &ScopedCredential,
    ) -> Result<()> {
        let response = self
            .client
            .put(self.object_url(key))
            .header(header::CONTENT_TYPE, content_type)
            .bearer_auth(&credential.token)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if let Some(denied) = Self::check_denied(status, &body) {
            return Err(denied);
        }
        Err(StoreError::Http(format!("put failed: {} {}", status, body)))
    }

    #[instrument(skip(self, credential), fields(key = %key))]
    async fn get_object(
        &self,
        key: &ObjectKey,
        credential: &ScopedCredential,
    ) -> Result<StoredObject> {
        let response = self
            .client
            .get(self.object_url(key))
            .bearer_auth(&credential.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Some(denied) = Self::check_denied(status, &body) {
                return Err(denied);
            }
            return Err(StoreError::Http(format!("get failed: {} {}", status, body)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = response.bytes().await?;

        Ok(StoredObject { content_type, data })
    }

    #[instrument(skip(self, credential), fields(key = %key))]
    async fn delete_object(&self, key: &ObjectKey, credential: &ScopedCredential) -> Result<()> {
        let response = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&credential.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.clone()));
        }
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if let Some(denied) = Self::check_denied(status, &body) {
            return Err(denied);
        }
        Err(StoreError::Http(format!(
            "delete failed: {} {}",
            status, body
        )))
    }
}
