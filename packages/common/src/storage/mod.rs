mod error;
mod hash;
mod key;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use hash::ContentHash;
pub use key::validate_key;
pub use traits::{BlobStore, BlobStoreProvider, BoxReader};
