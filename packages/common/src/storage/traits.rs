use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Key-addressed blob storage.
///
/// Keys follow the dotted format checked by [`super::validate_key`]. Callers
/// that derive keys from content hashes get content-addressed semantics, but
/// the store itself does not enforce them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether a payload is stored under `key`.
    async fn has_key(&self, key: &str) -> Result<bool, StorageError>;

    /// Store `data` under `key`, replacing any previous payload.
    async fn set(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve a payload as a streaming async reader.
    async fn get_stream(&self, key: &str) -> Result<BoxReader, StorageError>;

    /// Size of the payload stored under `key`, in bytes.
    async fn size(&self, key: &str) -> Result<u64, StorageError>;

    /// Largest payload [`BlobStore::set`] accepts, in bytes.
    fn max_size(&self) -> u64 {
        u64::MAX
    }

    /// Delete the payload stored under `key`.
    ///
    /// Returns `true` if a payload was deleted, `false` if none existed.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Opens a handle to a blob store.
///
/// Opening is expected to be cheap and to fail fast when the store is
/// misconfigured, so callers can check it before doing expensive work.
#[async_trait]
pub trait BlobStoreProvider: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn BlobStore>, StorageError>;
}
