//! Off-chain content store boundary
//!
//! Hosts the optional encrypted inheritance message. The store accepts a blob
//! and hands back an opaque locator; the registry only ever stores that
//! locator as a [`DataPointer`].

use std::collections::HashMap;

use async_trait::async_trait;
use heirswitch_types::DataPointer;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Default upper bound on a stored blob
pub const DEFAULT_MAX_BLOB_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("No data provided for upload")]
    Empty,

    #[error("Blob of {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Content not found: {locator}")]
    NotFound { locator: String },

    #[error("Content backend error: {message}")]
    Backend { message: String },
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `blob`, returning its locator
    async fn upload(&self, blob: Vec<u8>) -> Result<DataPointer, ContentError>;

    /// Fetch the blob stored under `locator`
    async fn fetch(&self, locator: &DataPointer) -> Result<Vec<u8>, ContentError>;
}

/// Content-addressed in-memory store
///
/// Locators are the hex SHA-256 of the blob, so uploading the same bytes
/// twice yields the same locator.
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    max_blob_bytes: usize,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_BLOB_BYTES)
    }

    pub fn with_limit(max_blob_bytes: usize) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            max_blob_bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn upload(&self, blob: Vec<u8>) -> Result<DataPointer, ContentError> {
        if blob.is_empty() {
            return Err(ContentError::Empty);
        }
        if blob.len() > self.max_blob_bytes {
            return Err(ContentError::TooLarge {
                size: blob.len(),
                max: self.max_blob_bytes,
            });
        }

        let locator = hex::encode(Sha256::digest(&blob));
        tracing::debug!(locator = %locator, size = blob.len(), "stored content blob");
        self.blobs.write().insert(locator.clone(), blob);
        Ok(DataPointer::new(locator))
    }

    async fn fetch(&self, locator: &DataPointer) -> Result<Vec<u8>, ContentError> {
        self.blobs
            .read()
            .get(locator.as_str())
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                locator: locator.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let store = InMemoryContentStore::new();
        let locator = store.upload(b"encrypted message".to_vec()).await.unwrap();
        assert_eq!(locator.as_str().len(), 64);
        assert_eq!(store.fetch(&locator).await.unwrap(), b"encrypted message");
    }

    #[tokio::test]
    async fn test_same_blob_same_locator() {
        let store = InMemoryContentStore::new();
        let a = store.upload(b"x".to_vec()).await.unwrap();
        let b = store.upload(b"x".to_vec()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_oversized() {
        let store = InMemoryContentStore::with_limit(4);
        assert_eq!(store.upload(vec![]).await, Err(ContentError::Empty));
        assert_eq!(
            store.upload(vec![0; 5]).await,
            Err(ContentError::TooLarge { size: 5, max: 4 })
        );
    }

    #[tokio::test]
    async fn test_unknown_locator() {
        let store = InMemoryContentStore::new();
        let result = store.fetch(&DataPointer::new("bafy-unknown")).await;
        assert!(matches!(result, Err(ContentError::NotFound { .. })));
    }
}
