use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::capture::{Operation, PhotoFormat};
use crate::entity::capture_photo;
use crate::error::{AppError, ErrorBody};
use crate::models::capture::CapturePhotoResponse;
use crate::state::AppState;

/// Room for the multipart framing and metadata field on top of the photo itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_blob_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Capture Photos",
    operation_id = "uploadCapturePhoto",
    summary = "Upload a photo from the capture app",
    description = "Stores the `photo` multipart field and records it as a photo facet. The \
        `metadata` field is JSON of the form `{\"capture_time_secs_utc\": 1364938231.5}`. \
        Uploading the same photo with the same capture time again only refreshes the facet.",
    params(("guest_id" = i64, Path, description = "Guest ID")),
    request_body(content_type = "multipart/form-data", description = "Photo and JSON metadata"),
    responses(
        (status = 201, description = "Photo facet created", body = CapturePhotoResponse),
        (status = 200, description = "Existing photo facet updated", body = CapturePhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 415, description = "Not a supported image (UNSUPPORTED_MEDIA_TYPE)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(guest_id))]
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(guest_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut photo_bytes: Option<Vec<u8>> = None;
    let mut metadata: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("photo") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;
                photo_bytes = Some(bytes.to_vec());
            }
            Some("metadata") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read metadata: {e}")))?;
                metadata = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    // Missing fields go through the store so they fail like empty ones.
    let result = state
        .capture_photos
        .save_or_update_photo(
            guest_id,
            photo_bytes.unwrap_or_default(),
            metadata.as_deref().unwrap_or_default(),
        )
        .await?;

    let status = match result.operation {
        Operation::Created => StatusCode::CREATED,
        Operation::Updated => StatusCode::OK,
    };
    Ok((status, Json(CapturePhotoResponse::from(result))))
}

#[utoipa::path(
    get,
    path = "/{facet_id}",
    tag = "Capture Photos",
    operation_id = "downloadCapturePhoto",
    summary = "Download a capture photo",
    description = "Streams the stored photo bytes. Supports ETag-based caching via If-None-Match; \
        the ETag is the photo's content hash.",
    params(
        ("guest_id" = i64, Path, description = "Guest ID"),
        ("facet_id" = i64, Path, description = "Photo facet ID"),
    ),
    responses(
        (status = 200, description = "Photo content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers), fields(guest_id, facet_id))]
pub async fn download_photo(
    State(state): State<AppState>,
    Path((guest_id, facet_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let facet = state
        .capture_facets
        .find_by_id(guest_id, facet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

    build_photo_response(&state, &facet, &headers).await
}

async fn build_photo_response(
    state: &AppState,
    facet: &capture_photo::Model,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let etag_value = format!("\"{}\"", facet.hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && etag_matches(val, &etag_value)
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let blob_store = state.blob_stores.open().await?;
    let size = blob_store.size(&facet.store_key).await?;
    let reader = blob_store.get_stream(&facet.store_key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&facet.image_format))
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Weak comparison of an `If-None-Match` list against a strong ETag.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

fn content_type(image_format: &str) -> &'static str {
    PhotoFormat::from_name(image_format)
        .map(|format| format.mime_type())
        .unwrap_or("application/octet-stream")
}
