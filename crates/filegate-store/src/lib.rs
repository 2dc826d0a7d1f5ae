//! # Filegate Store
//!
//! Object storage layer for the filegate gateway.
//!
//! This crate provides:
//! - **Object addressing**: the two-segment `{folder}/{file}` key
//! - **Scoped credentials**: single-operation tokens and their
//!   backend-side verification
//! - **Store backends**: a remote HTTP object store and an in-memory
//!   store for development and tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Gateway (filegate-api)      │
//! ├─────────────────────────────────────────┤
//! │            ObjectStore Trait            │
//! ├────────────────────┬────────────────────┤
//! │   HttpObjectStore  │  MemoryObjectStore │
//! ├────────────────────┴────────────────────┤
//! │          Backend storage resource       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every store call carries a [`ScopedCredential`] authorizing exactly one
//! operation kind on exactly one storage resource. The store side is where
//! that authorization is enforced; the gateway never widens a scope.

pub mod credential;
pub mod error;
pub mod flexible;
pub mod http;
pub mod key;
pub mod memory;

pub use credential::{
    CredentialError, OperationKind, ScopeClaims, ScopedCredential, StorageAction, TokenAuthority,
};
pub use error::{Result, StoreError};
pub use flexible::FlexibleObjectStore;
pub use http::{HttpObjectStore, HttpStoreConfig};
pub use key::{InvalidKey, ObjectKey};
pub use memory::MemoryObjectStore;

use async_trait::async_trait;
use bytes::Bytes;

/// A stored object: opaque bytes plus the content type recorded with them.
///
/// The payload is never inspected or transformed by this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// MIME type recorded at write time (arbitrary, possibly unregistered)
    pub content_type: String,
    /// Object payload, byte-for-byte as written
    pub data: Bytes,
}

/// Trait for object storage backends
///
/// Implementations perform exactly one backend call per method invocation
/// and reject any credential whose scope does not cover the operation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object verbatim under `key` with the given content type
    async fn put_object(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Bytes,
        credential: &ScopedCredential,
    ) -> Result<()>;

    /// Read the object at `key`, returning its bytes and stored content type
    async fn get_object(&self, key: &ObjectKey, credential: &ScopedCredential)
        -> Result<StoredObject>;

    /// Remove the object at `key`
    async fn delete_object(&self, key: &ObjectKey, credential: &ScopedCredential) -> Result<()>;
}
