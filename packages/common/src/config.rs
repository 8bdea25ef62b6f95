use std::path::PathBuf;

use serde::Deserialize;

/// Blob store configuration shared by every process that reads or writes photos.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Root directory of the key-value photo store. Must already exist.
    /// Default: "./data/blobs".
    #[serde(default = "default_storage_location")]
    pub location: PathBuf,
    /// Largest payload accepted by the store, in bytes. Default: 32 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
}

fn default_storage_location() -> PathBuf {
    PathBuf::from("./data/blobs")
}
fn default_max_blob_size() -> u64 {
    32 * 1024 * 1024
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
            max_blob_size: default_max_blob_size(),
        }
    }
}
