use serde::Deserialize;

/// Metadata sent alongside an uploaded photo.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UploadMetadata {
    #[serde(default = "missing_capture_time")]
    pub capture_time_secs_utc: f64,
}

fn missing_capture_time() -> f64 {
    -1.0
}

impl UploadMetadata {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_valid(&self) -> bool {
        self.capture_time_secs_utc.is_finite() && self.capture_time_secs_utc >= 0.0
    }

    /// Capture time in whole milliseconds, truncated toward zero.
    pub fn capture_time_millis_utc(&self) -> i64 {
        (self.capture_time_secs_utc * 1000.0) as i64
    }
}
