//! Gateway configuration

use serde::{Deserialize, Serialize};

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Object-storage backend base URL; `None` means in-memory storage
    pub backend_url: Option<String>,
    /// Storage resource (bucket) this gateway serves
    pub resource: String,
    /// Shared signing secret for scoped credentials; generated when absent
    pub credential_secret: Option<String>,
    /// Lifetime of an issued credential (seconds)
    pub credential_ttl_secs: u64,
    /// Force the in-memory store (for testing/development)
    pub use_memory_store: bool,
    /// Per-request backend call timeout (seconds)
    pub backend_timeout_secs: u64,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend_url: None,
            resource: "filegate".to_string(),
            credential_secret: None,
            credential_ttl_secs: 60,
            use_memory_store: false,
            backend_timeout_secs: 30,
            max_body_size: 1024 * 1024 * 1024, // 1 GB
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
