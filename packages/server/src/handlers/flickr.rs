use axum::Json;
use axum::extract::{Path, State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::entity::flickr_photo;
use crate::error::{AppError, ErrorBody};
use crate::flickr::FlickrPhotoFacetVO;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Flickr Photos",
    operation_id = "getFlickrPhoto",
    summary = "Get a Flickr photo facet",
    description = "Returns the photo with its Flickr page and thumbnail URLs.",
    params(
        ("guest_id" = i64, Path, description = "Guest ID"),
        ("id" = i64, Path, description = "Flickr photo facet ID"),
    ),
    responses(
        (status = 200, description = "Photo facet", body = FlickrPhotoFacetVO),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(guest_id, id))]
pub async fn get_flickr_photo(
    State(state): State<AppState>,
    Path((guest_id, id)): Path<(i64, i64)>,
) -> Result<Json<FlickrPhotoFacetVO>, AppError> {
    let facet = flickr_photo::Entity::find_by_id(id)
        .filter(flickr_photo::Column::GuestId.eq(guest_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

    Ok(Json(FlickrPhotoFacetVO::from_facet(&facet)))
}
