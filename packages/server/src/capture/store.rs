use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::storage::{BlobStore, BlobStoreProvider, StorageError};
use sea_orm::{NotSet, Set};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::error::PhotoStoreError;
use super::metadata::UploadMetadata;
use super::photo::PhotoRecord;
use super::repository::{FacetQuery, FacetWrite, PhotoFacetRepository};
use crate::entity::capture_photo;

/// Whether an upload created a new facet or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Created,
    Updated,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful [`CapturePhotoStore::save_or_update_photo`].
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub operation: Operation,
    pub photo: PhotoRecord,
    pub facet: capture_photo::Model,
}

/// Saves capture photos to the blob store and records them as facets.
///
/// Photo bytes are stored once per guest and content hash. Facets are unique
/// per (guest, hash, capture time), so re-uploading the same photo only
/// refreshes its facet's `time_updated`.
pub struct CapturePhotoStore {
    blob_stores: Arc<dyn BlobStoreProvider>,
    facets: Arc<dyn PhotoFacetRepository>,
}

impl CapturePhotoStore {
    pub fn new(
        blob_stores: Arc<dyn BlobStoreProvider>,
        facets: Arc<dyn PhotoFacetRepository>,
    ) -> Self {
        Self {
            blob_stores,
            facets,
        }
    }

    /// Validate a photo upload and persist it.
    ///
    /// Cheap checks run first: non-empty input, then opening the blob store,
    /// then the metadata, and only then is the image decoded and hashed.
    /// If the facet cannot be written, a blob written by this call is removed
    /// again before the error is returned.
    #[instrument(
        skip(self, photo_bytes, json_metadata),
        fields(bytes = photo_bytes.len(), hash, store_key)
    )]
    pub async fn save_or_update_photo(
        &self,
        guest_id: i64,
        photo_bytes: Vec<u8>,
        json_metadata: &str,
    ) -> Result<OperationResult, PhotoStoreError> {
        debug!(json_metadata, "Saving capture photo");

        if photo_bytes.is_empty() || json_metadata.is_empty() {
            let message = "photo bytes and JSON metadata must both be non-empty";
            error!(guest_id, "Photo upload rejected: {message}");
            return Err(PhotoStoreError::InvalidInput(message.into()));
        }

        let blob_store = self.blob_stores.open().await.map_err(|e| {
            error!(guest_id, error = %e, "Photo upload failed: blob store could not be opened");
            PhotoStoreError::StorageUnavailable(e)
        })?;

        let max_size = blob_store.max_size();
        if photo_bytes.len() as u64 > max_size {
            error!(
                guest_id,
                bytes = photo_bytes.len(),
                max_size,
                "Photo upload rejected: photo too large"
            );
            return Err(PhotoStoreError::InvalidInput(format!(
                "photo is {} bytes, the limit is {max_size}",
                photo_bytes.len()
            )));
        }

        let metadata = UploadMetadata::parse(json_metadata).map_err(|e| {
            error!(guest_id, error = %e, "Photo upload rejected: unparsable metadata");
            PhotoStoreError::InvalidInput(format!("metadata could not be parsed: {e}"))
        })?;
        if !metadata.is_valid() {
            error!(
                guest_id,
                capture_time_secs_utc = metadata.capture_time_secs_utc,
                "Photo upload rejected: invalid capture time"
            );
            return Err(PhotoStoreError::InvalidInput(
                "capture_time_secs_utc must be a non-negative number".into(),
            ));
        }

        let photo = build_photo(guest_id, photo_bytes, metadata.capture_time_millis_utc()).await?;
        let span = tracing::Span::current();
        span.record("hash", tracing::field::display(photo.hash()));
        span.record("store_key", photo.store_key());

        let wrote_blob = write_blob_if_absent(&*blob_store, &photo).await?;

        let now = Utc::now();
        let query = FacetQuery {
            guest_id,
            hash: photo.hash().to_hex(),
            start: photo.capture_time_millis_utc(),
        };
        let modifier = |existing: Option<capture_photo::Model>| match existing {
            None => new_facet(&photo, now),
            Some(existing) => {
                let mut facet: capture_photo::ActiveModel = existing.into();
                facet.time_updated = Set(now);
                facet
            }
        };

        let FacetWrite { facet, was_created } =
            match self.facets.find_or_create_or_modify(&query, &modifier).await {
                Ok(Some(write)) => write,
                Ok(None) => {
                    error!(guest_id, "Photo upload failed: facet write returned nothing");
                    discard_blob(&*blob_store, &photo, wrote_blob).await;
                    return Err(PhotoStoreError::StorageFailure(
                        "the database did not return the saved facet".into(),
                    ));
                }
                Err(e) => {
                    error!(guest_id, error = %e, "Photo upload failed: facet write error");
                    discard_blob(&*blob_store, &photo, wrote_blob).await;
                    return Err(PhotoStoreError::StorageFailure(format!(
                        "failed to write photo facet: {e}"
                    )));
                }
            };

        let operation = if was_created {
            Operation::Created
        } else {
            Operation::Updated
        };
        info!(guest_id, facet_id = facet.id, %operation, "Capture photo saved");

        Ok(OperationResult {
            operation,
            photo,
            facet,
        })
    }
}

/// Decode and hash on the blocking pool; large photos take a while.
async fn build_photo(
    guest_id: i64,
    bytes: Vec<u8>,
    capture_time_millis_utc: i64,
) -> Result<PhotoRecord, PhotoStoreError> {
    let built =
        tokio::task::spawn_blocking(move || PhotoRecord::new(guest_id, bytes, capture_time_millis_utc))
            .await
            .map_err(|e| {
                error!(guest_id, error = %e, "Photo validation task failed");
                PhotoStoreError::InvalidInput(format!("photo could not be validated: {e}"))
            })?;

    built.map_err(|e| {
        error!(guest_id, error = %e, "Photo upload rejected: photo could not be read");
        PhotoStoreError::from(e)
    })
}

/// Returns whether this call wrote the blob.
async fn write_blob_if_absent(
    store: &dyn BlobStore,
    photo: &PhotoRecord,
) -> Result<bool, PhotoStoreError> {
    let key = photo.store_key();
    let exists = store.has_key(key).await.map_err(|e| {
        error!(guest_id = photo.guest_id(), error = %e, "Photo upload failed: blob lookup error");
        PhotoStoreError::StorageFailure(format!("failed to query photo store: {e}"))
    })?;

    if exists {
        debug!(guest_id = photo.guest_id(), "Photo bytes already stored, skipping write");
        return Ok(false);
    }

    store.set(key, photo.bytes()).await.map_err(|e| match e {
        StorageError::SizeLimitExceeded { .. } => {
            error!(guest_id = photo.guest_id(), error = %e, "Photo upload rejected: photo too large");
            PhotoStoreError::InvalidInput(e.to_string())
        }
        e => {
            error!(guest_id = photo.guest_id(), error = %e, "Photo upload failed: blob write error");
            PhotoStoreError::StorageFailure(format!("failed to save photo to the photo store: {e}"))
        }
    })?;
    debug!(guest_id = photo.guest_id(), "Photo bytes stored");
    Ok(true)
}

/// Best-effort removal of a blob orphaned by a failed facet write.
///
/// Blobs that existed before this upload are left alone: other facets of the
/// same guest may reference them.
async fn discard_blob(store: &dyn BlobStore, photo: &PhotoRecord, wrote_blob: bool) {
    let guest_id = photo.guest_id();
    let store_key = photo.store_key();
    if !wrote_blob {
        warn!(guest_id, store_key, "Keeping pre-existing photo bytes after failed facet write");
        return;
    }

    // An upload at another capture time may have committed a facet for this
    // key since the write; the key is logged so such facets can be found.
    match store.delete(store_key).await {
        Ok(true) => warn!(guest_id, store_key, "Removed photo bytes after failed facet write"),
        Ok(false) => warn!(
            guest_id,
            store_key, "Photo bytes were already gone after failed facet write"
        ),
        Err(e) => error!(
            guest_id,
            store_key,
            error = %e,
            "Failed to remove photo bytes after failed facet write; blob is orphaned"
        ),
    }
}

fn new_facet(photo: &PhotoRecord, now: DateTime<Utc>) -> capture_photo::ActiveModel {
    capture_photo::ActiveModel {
        id: NotSet,
        guest_id: Set(photo.guest_id()),
        hash: Set(photo.hash().to_hex()),
        start: Set(photo.capture_time_millis_utc()),
        end: Set(photo.capture_time_millis_utc()),
        store_key: Set(photo.store_key().to_owned()),
        image_format: Set(photo.format().as_str().to_owned()),
        image_width: Set(photo.width() as i32),
        image_height: Set(photo.height() as i32),
        size: Set(photo.bytes().len() as i64),
        time_created: Set(now),
        time_updated: Set(now),
    }
}
