//! Application state

use crate::config::GatewayConfig;
use crate::proxy::ObjectProxy;
use crate::scoper::{AuthorityScoper, CredentialScoper};
use anyhow::Context;
use filegate_store::{
    FlexibleObjectStore, HttpObjectStore, HttpStoreConfig, MemoryObjectStore, ObjectStore,
    TokenAuthority,
};
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Application state shared across handlers.
///
/// Holds only immutable wiring: configuration, the credential scoper, and
/// the object proxy. Nothing here carries per-request state, so requests
/// never contend with each other.
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Credential scoper (one single-action credential per proxied call)
    pub scoper: Arc<dyn CredentialScoper>,
    /// Object proxy over the selected backend
    pub proxy: ObjectProxy,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let secret = match &config.credential_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            Some(_) => anyhow::bail!("credential secret must not be empty"),
            None => {
                if config.backend_url.is_some() && !config.use_memory_store {
                    anyhow::bail!(
                        "a remote backend requires a shared credential secret \
                         (set FILEGATE_CREDENTIAL_SECRET)"
                    );
                }
                warn!("No credential secret configured; generating an ephemeral one");
                generate_secret()
            }
        };

        let authority = Arc::new(TokenAuthority::new(
            &secret,
            &config.resource,
            config.credential_ttl_secs,
        ));

        // Pick the backend: remote HTTP store when configured, in-memory
        // otherwise. An unreachable remote degrades to in-memory with a
        // warning instead of refusing to start.
        let store = if config.use_memory_store || config.backend_url.is_none() {
            info!("Using in-memory object store (data will not persist)");
            FlexibleObjectStore::Memory(MemoryObjectStore::new(Arc::clone(&authority)))
        } else {
            let base_url = config.backend_url.clone().context("backend url")?;
            let store_config = HttpStoreConfig {
                base_url: base_url.clone(),
                resource: config.resource.clone(),
                timeout: Duration::from_secs(config.backend_timeout_secs),
            };
            match HttpObjectStore::new(store_config).await {
                Ok(store) => {
                    info!("Connected to storage backend at {}", base_url);
                    FlexibleObjectStore::Http(store)
                }
                Err(e) => {
                    warn!(
                        "Failed to connect to storage backend ({}), falling back to in-memory storage",
                        e
                    );
                    FlexibleObjectStore::Memory(MemoryObjectStore::new(Arc::clone(&authority)))
                }
            }
        };

        if store.is_persistent() {
            info!("✓ Storage mode: remote backend (persistent)");
        } else {
            warn!("⚠ Storage mode: in-memory (NOT persistent - for development only)");
        }

        let proxy = ObjectProxy::new(
            Arc::new(store),
            Duration::from_secs(config.backend_timeout_secs),
        );
        let scoper = Arc::new(AuthorityScoper::new(authority));

        Ok(Self {
            config,
            scoper,
            proxy,
        })
    }

    /// Assemble state from explicit parts. Test seam: lets suites inject
    /// instrumented stores or deliberately mis-scoped scopers.
    pub fn with_parts(
        config: GatewayConfig,
        scoper: Arc<dyn CredentialScoper>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let proxy = ObjectProxy::new(store, Duration::from_secs(config.backend_timeout_secs));
        Self {
            config,
            scoper,
            proxy,
        }
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
