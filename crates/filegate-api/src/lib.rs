//! # Filegate
//!
//! HTTP file-storage gateway proxying to an object-storage backend with
//! per-operation, least-privilege credentials.
//!
//! This crate provides:
//! - **File API**: `PUT`/`GET`/`DELETE` on `/files/{folder}/{file}`
//! - **Credential scoping**: one single-action credential per proxied call
//! - **Binary transparency**: payloads pass through byte-for-byte
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  Filegate Gateway                   │
//! ├─────────────────────────────────────────────────────┤
//! │  Path Router │ Credential Scoper │ Object Proxy     │
//! ├─────────────────────────────────────────────────────┤
//! │                  filegate-store                     │
//! │        (HTTP backend or in-memory fallback)         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Each request moves through one pipeline: route the path to an operation
//! kind and object key, obtain a credential scoped to exactly that
//! operation, execute exactly one backend call, relay the result. The
//! first failure terminates the pipeline and is translated to an HTTP
//! status in exactly one place ([`error::ApiError`]).

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod router;
pub mod routes;
pub mod scoper;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
