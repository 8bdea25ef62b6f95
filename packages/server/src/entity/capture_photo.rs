use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A photo uploaded from the capture app, one row per (guest, hash, capture time).
///
/// The `(guest_id, hash, start)` triple is unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "capture_photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub guest_id: i64,

    /// SHA-256 of the photo bytes, lowercase hex.
    pub hash: String,

    /// Capture instant, UTC milliseconds.
    pub start: i64,

    /// Photos are instantaneous, so this always equals `start`.
    pub end: i64,

    /// Key of the photo bytes in the blob store.
    pub store_key: String,

    /// Image format name, e.g. "png" or "jpeg".
    pub image_format: String,
    pub image_width: i32,
    pub image_height: i32,

    /// Size of the photo in bytes.
    pub size: i64,

    pub time_created: DateTimeUtc,

    pub time_updated: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
