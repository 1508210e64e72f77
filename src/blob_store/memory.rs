//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::backend::BlobStore;
use super::errors::{BlobError, BlobResult};

/// Process-local blob store, used in tests and for cache-less runs
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BlobError::Internal("Lock poisoned".into()))?;

        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, data: &[u8]) -> BlobResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BlobError::Internal("Lock poisoned".into()))?;

        entries.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}
