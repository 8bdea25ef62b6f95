use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::capture::{CapturePhotoStore, PhotoFacetRepository};
use common::storage::BlobStoreProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blob_stores: Arc<dyn BlobStoreProvider>,
    pub capture_facets: Arc<dyn PhotoFacetRepository>,
    pub capture_photos: Arc<CapturePhotoStore>,
}

impl AppState {
    /// Wire the capture photo store from its collaborators.
    pub fn new(
        db: DatabaseConnection,
        blob_stores: Arc<dyn BlobStoreProvider>,
        capture_facets: Arc<dyn PhotoFacetRepository>,
    ) -> Self {
        let capture_photos = Arc::new(CapturePhotoStore::new(
            blob_stores.clone(),
            capture_facets.clone(),
        ));
        Self {
            db,
            blob_stores,
            capture_facets,
            capture_photos,
        }
    }
}
