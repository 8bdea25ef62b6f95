use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capture::{Operation, OperationResult};
use crate::entity::capture_photo;

/// Response DTO for a capture photo upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CapturePhotoResponse {
    /// Photo facet ID.
    #[schema(example = 1)]
    pub id: i64,
    /// Whether the upload created the facet or refreshed an existing one.
    pub operation: Operation,
    #[schema(example = 42)]
    pub guest_id: i64,
    /// SHA-256 of the photo bytes.
    #[schema(example = "a1b2c3d4e5f6...")]
    pub hash: String,
    /// Capture instant, UTC milliseconds.
    #[schema(example = 1000500)]
    pub capture_time_millis_utc: i64,
    #[schema(example = "jpeg")]
    pub image_format: String,
    #[schema(example = 3264)]
    pub width: i32,
    #[schema(example = 2448)]
    pub height: i32,
    /// Photo size in bytes.
    pub size: i64,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl CapturePhotoResponse {
    fn from_facet(facet: capture_photo::Model, operation: Operation) -> Self {
        Self {
            id: facet.id,
            operation,
            guest_id: facet.guest_id,
            hash: facet.hash,
            capture_time_millis_utc: facet.start,
            image_format: facet.image_format,
            width: facet.image_width,
            height: facet.image_height,
            size: facet.size,
            time_created: facet.time_created,
            time_updated: facet.time_updated,
        }
    }
}

impl From<OperationResult> for CapturePhotoResponse {
    fn from(result: OperationResult) -> Self {
        Self::from_facet(result.facet, result.operation)
    }
}
