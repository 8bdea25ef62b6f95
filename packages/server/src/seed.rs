use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{capture_photo, flickr_photo};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite indexes, so they are
/// created here on startup. The capture photo key index is unique and the
/// photo upsert depends on it, so failing to create it is an error.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_capture_photo_guest_hash_start")
        .table(capture_photo::Entity)
        .col(capture_photo::Column::GuestId)
        .col(capture_photo::Column::Hash)
        .col(capture_photo::Column::Start)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_capture_photo_guest_hash_start exists");

    // Timeline queries: a guest's photos ordered by capture time.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_flickr_photo_guest_date_taken")
        .table(flickr_photo::Entity)
        .col(flickr_photo::Column::GuestId)
        .col(flickr_photo::Column::DateTaken)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_flickr_photo_guest_date_taken exists"),
        Err(e) => {
            tracing::warn!(
                "Failed to create index idx_flickr_photo_guest_date_taken: {}",
                e
            );
        }
    }

    Ok(())
}
