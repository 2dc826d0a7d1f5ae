//! Object proxy: one backend call per request
//!
//! The proxy is the single point where the gateway touches the backend.
//! Each `execute` issues exactly one storage call under a per-request
//! timeout, with no caching and no internal retries. If the caller disconnects,
//! axum drops the handler future and the in-flight call is cancelled with
//! it.

use crate::error::ProxyError;
use bytes::Bytes;
use filegate_store::{ObjectKey, ObjectStore, OperationKind, ScopedCredential, StoreError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Result of a successfully proxied backend call
#[derive(Debug)]
pub enum ProxyOutcome {
    /// Object written; the request's content type is echoed back
    Stored { content_type: String },
    /// Object read; stored bytes and stored content type, unmodified
    Fetched { content_type: String, body: Bytes },
    /// Object removed
    Deleted,
}

/// Executes backend storage calls with a scoped credential
pub struct ObjectProxy {
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl ObjectProxy {
    /// Create a proxy over the given store with a per-call timeout
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Execute one backend call for `operation` at `key`.
    ///
    /// PUT requires a body; GET and DELETE require none. The payload is
    /// passed through verbatim in both directions.
    #[instrument(skip(self, credential, body), fields(operation = %operation, key = %key))]
    pub async fn execute(
        &self,
        operation: OperationKind,
        key: &ObjectKey,
        credential: &ScopedCredential,
        content_type: &str,
        body: Option<Bytes>,
    ) -> Result<ProxyOutcome, ProxyError> {
        match operation {
            OperationKind::Put => {
                let Some(data) = body else {
                    return Err(ProxyError::BodyMismatch { operation });
                };
                self.bounded(self.store.put_object(key, content_type, data, credential))
                    .await?;
                Ok(ProxyOutcome::Stored {
                    content_type: content_type.to_string(),
                })
            }
            OperationKind::Get => {
                if body.is_some() {
                    return Err(ProxyError::BodyMismatch { operation });
                }
                let object = self.bounded(self.store.get_object(key, credential)).await?;
                Ok(ProxyOutcome::Fetched {
                    content_type: object.content_type,
                    body: object.data,
                })
            }
            OperationKind::Delete => {
                if body.is_some() {
                    return Err(ProxyError::BodyMismatch { operation });
                }
                self.bounded(self.store.delete_object(key, credential)).await?;
                Ok(ProxyOutcome::Deleted)
            }
        }
    }

    /// Run one store call under the per-request timeout. On expiry the
    /// future is dropped, abandoning the in-flight backend call.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, ProxyError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(ProxyError::from),
            Err(_) => Err(ProxyError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}
