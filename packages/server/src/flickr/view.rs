use chrono::{DateTime, Timelike};
use serde::Serialize;

use crate::entity::flickr_photo;

/// Width and height of a thumbnail, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    const fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }
}

/// Flickr size suffixes in display order, with their edge length.
///
/// Past 150px Flickr sizes the longest side only; without the original
/// dimensions each size is reported as a square of that edge.
pub const THUMBNAILS: [(&str, Dimension); 9] = [
    ("s", Dimension::square(75)),
    ("q", Dimension::square(150)),
    ("t", Dimension::square(100)),
    ("m", Dimension::square(240)),
    ("n", Dimension::square(320)),
    ("-", Dimension::square(500)),
    ("z", Dimension::square(640)),
    ("c", Dimension::square(800)),
    ("b", Dimension::square(1024)),
];

/// Size suffix used for the main photo URL.
const PHOTO_SUFFIX: &str = "z";

/// Display-ready view of a Flickr photo facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FlickrPhotoFacetVO {
    /// When the photo was taken, UTC milliseconds.
    pub start: i64,
    /// Minute of the day of `start`.
    pub start_minute: u32,
    /// Always "local": Flickr reports the camera's wall-clock time.
    pub time_type: String,
    pub description: String,
    pub photo_url: String,
    /// Thumbnail URLs, smallest first, aligned with `thumbnail_sizes`.
    pub thumbnail_urls: Vec<String>,
    pub thumbnail_sizes: Vec<Dimension>,
}

impl FlickrPhotoFacetVO {
    pub fn from_facet(facet: &flickr_photo::Model) -> Self {
        let thumbnail_urls = THUMBNAILS
            .iter()
            .map(|(suffix, _)| photo_url(facet, suffix))
            .collect();

        Self {
            start: facet.date_taken,
            start_minute: minute_of_day(facet.date_taken),
            time_type: "local".into(),
            description: facet.title.clone(),
            photo_url: photo_url(facet, PHOTO_SUFFIX),
            thumbnail_urls,
            thumbnail_sizes: THUMBNAILS.iter().map(|(_, size)| *size).collect(),
        }
    }

    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    pub fn thumbnail(&self, index: usize) -> Option<&str> {
        self.thumbnail_urls.get(index).map(String::as_str)
    }

    pub fn thumbnail_sizes(&self) -> &[Dimension] {
        &self.thumbnail_sizes
    }
}

fn photo_url(facet: &flickr_photo::Model, suffix: &str) -> String {
    format!(
        "http://farm{}.static.flickr.com/{}/{}_{}_{}.jpg",
        facet.farm, facet.server, facet.flickr_id, facet.secret, suffix
    )
}

fn minute_of_day(millis_utc: i64) -> u32 {
    DateTime::from_timestamp_millis(millis_utc)
        .map(|t| t.hour() * 60 + t.minute())
        .unwrap_or(0)
}
