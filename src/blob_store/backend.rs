//! # Blob Store Trait

use async_trait::async_trait;

use super::errors::BlobResult;

/// Backend trait for durable blob storage
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;

    /// Replace the value stored under `key`
    async fn put(&self, key: &str, data: &[u8]) -> BlobResult<()>;
}
