use std::fmt;
use std::io::Cursor;

use common::storage::ContentHash;
use image::{ImageError, ImageFormat, ImageReader};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid photo: {0}")]
    Invalid(String),
}

/// Image formats accepted from the capture app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFormat {
    Png,
    Jpeg,
    Webp,
}

impl PhotoFormat {
    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    /// Inverse of [`PhotoFormat::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "png" => Some(Self::Png),
            "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for PhotoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated photo upload: the raw bytes, when it was taken, and the
/// identifiers derived from its content.
///
/// Building one decodes the image, so a `PhotoRecord` always holds a
/// decodable image in a supported format. It has no side effects.
#[derive(Clone)]
pub struct PhotoRecord {
    guest_id: i64,
    bytes: Vec<u8>,
    capture_time_millis_utc: i64,
    hash: ContentHash,
    store_key: String,
    format: PhotoFormat,
    width: u32,
    height: u32,
}

impl PhotoRecord {
    pub fn new(
        guest_id: i64,
        bytes: Vec<u8>,
        capture_time_millis_utc: i64,
    ) -> Result<Self, PhotoError> {
        if capture_time_millis_utc < 0 {
            return Err(PhotoError::Invalid(format!(
                "capture time must not be negative, got {capture_time_millis_utc}"
            )));
        }
        if bytes.is_empty() {
            return Err(PhotoError::Invalid("photo is empty".into()));
        }

        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PhotoError::Invalid(e.to_string()))?;
        let format = reader
            .format()
            .and_then(PhotoFormat::from_image_format)
            .ok_or_else(|| {
                PhotoError::UnsupportedFormat("not a PNG, JPEG or WebP image".into())
            })?;
        let image = reader.decode().map_err(classify_decode_error)?;

        let hash = ContentHash::compute(&bytes);
        let store_key = store_key(guest_id, &hash);

        Ok(Self {
            guest_id,
            capture_time_millis_utc,
            hash,
            store_key,
            format,
            width: image.width(),
            height: image.height(),
            bytes,
        })
    }

    pub fn guest_id(&self) -> i64 {
        self.guest_id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn capture_time_millis_utc(&self) -> i64 {
        self.capture_time_millis_utc
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn format(&self) -> PhotoFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for PhotoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoRecord")
            .field("guest_id", &self.guest_id)
            .field("bytes", &self.bytes.len())
            .field("capture_time_millis_utc", &self.capture_time_millis_utc)
            .field("hash", &self.hash)
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Blob store key for a guest's photo. Depends only on the guest and the
/// content, never on capture time.
pub fn store_key(guest_id: i64, hash: &ContentHash) -> String {
    format!(
        "{guest_id}.capture.photos.{}.{}",
        hash.shard_prefix(),
        hash.shard_suffix()
    )
}

fn classify_decode_error(err: ImageError) -> PhotoError {
    match err {
        // Reads come from memory, so an IO error here means truncated data.
        ImageError::Decoding(_) | ImageError::Unsupported(_) | ImageError::IoError(_) => {
            PhotoError::UnsupportedFormat(err.to_string())
        }
        other => PhotoError::Invalid(other.to_string()),
    }
}
