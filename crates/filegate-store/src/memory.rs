//! In-memory object store for development and tests

use crate::{ObjectKey, ObjectStore, Result, ScopedCredential, StoreError, StoredObject, TokenAuthority};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// An in-memory object store.
///
/// Enforces the same per-operation credential checks a real backend would:
/// every call is verified against the shared [`TokenAuthority`] before the
/// map is touched. Contents do not survive a restart.
#[derive(Clone)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<ObjectKey, StoredObject>>,
    authority: Arc<TokenAuthority>,
}

impl MemoryObjectStore {
    /// Create an empty store verifying against the given authority
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            authority,
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total payload size across all objects
    pub fn total_size(&self) -> u64 {
        self.objects
            .iter()
            .map(|entry| entry.value().data.len() as u64)
            .sum()
    }

    /// Drop all objects
    pub fn clear(&self) {
        self.objects.clear();
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Bytes,
        credential: &ScopedCredential,
    ) -> Result<()> {
        self.authority
            .verify(credential, crate::StorageAction::WriteObject)?;

        self.objects.insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn get_object(
        &self,
        key: &ObjectKey,
        credential: &ScopedCredential,
    ) -> Result<StoredObject> {
        self.authority
            .verify(credential, crate::StorageAction::ReadObject)?;

        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    async fn delete_object(&self, key: &ObjectKey, credential: &ScopedCredential) -> Result<()> {
        self.authority
            .verify(credential, crate::StorageAction::DeleteObject)?;

        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }
}
