//! Runtime-selected object store backend

use crate::{
    HttpObjectStore, MemoryObjectStore, ObjectKey, ObjectStore, Result, ScopedCredential,
    StoredObject,
};
use async_trait::async_trait;
use bytes::Bytes;

/// Object store selected at startup: a remote HTTP backend, or the
/// in-memory store as the development fallback.
pub enum FlexibleObjectStore {
    /// Remote object-storage backend
    Http(HttpObjectStore),
    /// In-memory storage (fallback)
    Memory(MemoryObjectStore),
}

impl FlexibleObjectStore {
    /// Whether objects survive a gateway restart
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

#[async_trait]
impl ObjectStore for FlexibleObjectStore {
    async fn put_object(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Bytes,
        credential: &ScopedCredential,
    ) -> Result<()> {
        match self {
            Self::Http(store) => store.put_object(key, content_type, data, credential).await,
            Self::Memory(store) => store.put_object(key, content_type, data, credential).await,
        }
    }

    async fn get_object(
        &self,
        key: &ObjectKey,
        credential: &ScopedCredential,
    ) -> Result<StoredObject> {
        match self {
            Self::Http(store) => store.get_object(key, credential).await,
            Self::Memory(store) => store.get_object(key, credential).await,
        }
    }

    async fn delete_object(&self, key: &ObjectKey, credential: &ScopedCredential) -> Result<()> {
        match self {
            Self::Http(store) => store.delete_object(key, credential).await,
            Self::Memory(store) => store.delete_object(key, credential).await,
        }
    }
}
