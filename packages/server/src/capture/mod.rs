//! Photos uploaded from the capture app: validation, content-addressed blob
//! storage and the per-guest photo facets that reference it.

mod error;
mod metadata;
mod photo;
mod repository;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::PhotoStoreError;
pub use metadata::UploadMetadata;
pub use photo::{PhotoError, PhotoFormat, PhotoRecord, store_key};
pub use repository::{
    FacetModifier, FacetQuery, FacetWrite, PhotoFacetRepository, SeaOrmFacetRepository,
};
pub use store::{CapturePhotoStore, Operation, OperationResult};
