use async_trait::async_trait;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, TransactionTrait,
};
use tracing::debug;

use crate::entity::capture_photo;

/// Identifies a single capture photo facet: "guest_id = ? AND hash = ? AND start = ?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetQuery {
    pub guest_id: i64,
    pub hash: String,
    pub start: i64,
}

/// Outcome of [`PhotoFacetRepository::find_or_create_or_modify`].
#[derive(Debug, Clone)]
pub struct FacetWrite {
    /// The facet as persisted.
    pub facet: capture_photo::Model,
    /// `true` if no facet matched the query and a new one was inserted.
    pub was_created: bool,
}

/// Builds the facet to persist from the existing match, if any.
///
/// May be called more than once per write when a concurrent insert wins.
pub type FacetModifier<'a> =
    dyn Fn(Option<capture_photo::Model>) -> capture_photo::ActiveModel + Send + Sync + 'a;

/// Durable storage of capture photo facets.
#[async_trait]
pub trait PhotoFacetRepository: Send + Sync {
    /// Look up the facet matching `query` and either create it or modify it
    /// with `modifier`, as one indivisible operation.
    ///
    /// Concurrent calls for the same query never both create. Returns `None`
    /// if nothing was persisted.
    async fn find_or_create_or_modify(
        &self,
        query: &FacetQuery,
        modifier: &FacetModifier<'_>,
    ) -> Result<Option<FacetWrite>, DbErr>;

    async fn find_by_id(
        &self,
        guest_id: i64,
        id: i64,
    ) -> Result<Option<capture_photo::Model>, DbErr>;
}

/// [`PhotoFacetRepository`] backed by the relational database.
///
/// Relies on the unique index over `(guest_id, hash, start)` created by
/// `seed::ensure_indexes`.
#[derive(Clone)]
pub struct SeaOrmFacetRepository {
    db: DatabaseConnection,
}

impl SeaOrmFacetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotoFacetRepository for SeaOrmFacetRepository {
    async fn find_or_create_or_modify(
        &self,
        query: &FacetQuery,
        modifier: &FacetModifier<'_>,
    ) -> Result<Option<FacetWrite>, DbErr> {
        let txn = self.db.begin().await?;

        let write = match find_locked(&txn, query).await? {
            Some(existing) => Some(modify(&txn, existing, modifier).await?),
            None => {
                if insert_if_absent(&txn, modifier(None)).await? {
                    find_locked(&txn, query).await?.map(|facet| FacetWrite {
                        facet,
                        was_created: true,
                    })
                } else {
                    // A concurrent upload inserted the same key first.
                    debug!(guest_id = query.guest_id, hash = %query.hash, "Facet insert lost race");
                    match find_locked(&txn, query).await? {
                        Some(existing) => Some(modify(&txn, existing, modifier).await?),
                        None => None,
                    }
                }
            }
        };

        txn.commit().await?;
        Ok(write)
    }

    async fn find_by_id(
        &self,
        guest_id: i64,
        id: i64,
    ) -> Result<Option<capture_photo::Model>, DbErr> {
        capture_photo::Entity::find_by_id(id)
            .filter(capture_photo::Column::GuestId.eq(guest_id))
            .one(&self.db)
            .await
    }
}

async fn find_locked(
    txn: &DatabaseTransaction,
    query: &FacetQuery,
) -> Result<Option<capture_photo::Model>, DbErr> {
    capture_photo::Entity::find()
        .filter(capture_photo::Column::GuestId.eq(query.guest_id))
        .filter(capture_photo::Column::Hash.eq(&query.hash))
        .filter(capture_photo::Column::Start.eq(query.start))
        .lock(LockType::Update)
        .one(txn)
        .await
}

async fn modify(
    txn: &DatabaseTransaction,
    existing: capture_photo::Model,
    modifier: &FacetModifier<'_>,
) -> Result<FacetWrite, DbErr> {
    let facet = modifier(Some(existing)).update(txn).await?;
    Ok(FacetWrite {
        facet,
        was_created: false,
    })
}

/// Insert unless a facet with the same key exists. Returns whether a row was inserted.
async fn insert_if_absent(
    txn: &DatabaseTransaction,
    model: capture_photo::ActiveModel,
) -> Result<bool, DbErr> {
    let result = capture_photo::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                capture_photo::Column::GuestId,
                capture_photo::Column::Hash,
                capture_photo::Column::Start,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(txn)
        .await;

    match result {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}
