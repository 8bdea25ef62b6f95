use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;
use tracing::debug;

use super::error::StorageError;
use super::key::validate_key;
use super::traits::{BlobStore, BlobStoreProvider, BoxReader};

/// Filesystem-backed key-value blob store.
///
/// Each dot-separated key segment becomes one directory level, so
/// `42.capture.photos.ab.cdef` is stored at `{base_path}/42/capture/photos/ab/cdef`.
/// Writes go to `{base_path}/.tmp` first and are renamed into place.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Open a store rooted at an existing directory.
    ///
    /// Fails with [`StorageError::Unavailable`] if `base_path` is missing or
    /// is not a directory.
    pub async fn open(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        match fs::metadata(&base_path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(StorageError::Unavailable(format!(
                    "{} is not a directory",
                    base_path.display()
                )));
            }
            Err(e) => {
                return Err(StorageError::Unavailable(format!(
                    "{}: {e}",
                    base_path.display()
                )));
            }
        }

        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let segments = validate_key(key)?;
        Ok(segments
            .into_iter()
            .fold(self.base_path.clone(), |path, segment| path.join(segment)))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn has_key(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let path = self.key_path(key)?;
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(key, bytes = data.len(), "Stored blob");
        Ok(())
    }

    fn max_size(&self) -> u64 {
        self.max_size
    }

    async fn get_stream(&self, key: &str) -> Result<BoxReader, StorageError> {
        let path = self.key_path(key)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, key: &str) -> Result<u64, StorageError> {
        let path = self.key_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(key.into())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Opens a [`FilesystemBlobStore`] at a configured location on every call.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStoreProvider {
    location: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStoreProvider {
    pub fn new(location: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            location: location.into(),
            max_size,
        }
    }
}

#[async_trait]
impl BlobStoreProvider for FilesystemBlobStoreProvider {
    async fn open(&self) -> Result<Arc<dyn BlobStore>, StorageError> {
        let store = FilesystemBlobStore::open(self.location.clone(), self.max_size).await?;
        Ok(Arc::new(store))
    }
}
