use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest(
            "/guests/{guest_id}/capture/photos",
            capture_photo_routes(config.storage.max_blob_size),
        )
        .nest("/guests/{guest_id}/flickr/photos", flickr_photo_routes())
}

fn capture_photo_routes(max_blob_size: u64) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::capture::upload_photo))
        .layer(handlers::capture::upload_body_limit(max_blob_size));

    OpenApiRouter::new()
        .routes(routes!(handlers::capture::download_photo))
        .merge(upload)
}

fn flickr_photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::flickr::get_flickr_photo))
}
