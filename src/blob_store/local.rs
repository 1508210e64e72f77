//! # Local Filesystem Backend
//!
//! One file per key, named by the SHA-256 of the key. Each file holds a
//! CRC32 of the payload followed by the payload. Writes go to a temporary
//! file that is renamed over the target.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use uuid::Uuid;

use super::backend::BlobStore;
use super::errors::{BlobError, BlobResult};

const CHECKSUM_LEN: usize = 4;

/// Local filesystem blob store
#[derive(Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create a store for one cache generation under `base`
    pub fn namespaced(base: &Path, namespace: &str) -> Self {
        Self::new(base.join(namespace))
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.root.join(format!("{}.blob", name))
    }
}

fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHECKSUM_LEN + data.len());
    out.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
    out.extend_from_slice(data);
    out
}

fn decode(key: &str, raw: &[u8]) -> BlobResult<Vec<u8>> {
    if raw.len() < CHECKSUM_LEN {
        return Err(BlobError::ChecksumMismatch(key.to_string()));
    }

    let (header, payload) = raw.split_at(CHECKSUM_LEN);
    let stored = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);

    if crc32fast::hash(payload) != stored {
        return Err(BlobError::ChecksumMismatch(key.to_string()));
    }

    Ok(payload.to_vec())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let path = self.full_path(key);

        match fs::read(&path).await {
            Ok(raw) => decode(key, &raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, data: &[u8]) -> BlobResult<()> {
        fs::create_dir_all(&self.root).await?;

        let target = self.full_path(key);
        let tmp = target.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));

        fs::write(&tmp, encode(data)).await?;
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }
}
