use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Photo metadata imported from Flickr.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flickr_photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub guest_id: i64,

    /// Flickr's own photo identifier.
    pub flickr_id: String,

    pub farm: String,
    pub server: String,
    pub secret: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// When the photo was taken, UTC milliseconds.
    pub date_taken: i64,

    pub time_created: DateTimeUtc,

    pub time_updated: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
