use super::error::StorageError;

/// Validate a dot-separated store key and return its segments.
///
/// Every segment must be non-empty and consist only of ASCII alphanumerics,
/// `_` or `-`, so a key can never name anything outside the store root.
pub fn validate_key(key: &str) -> Result<Vec<&str>, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".into()));
    }

    let segments: Vec<&str> = key.split('.').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(StorageError::InvalidKey(format!(
                "key '{key}' contains an empty segment"
            )));
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(StorageError::InvalidKey(format!(
                "key '{key}' contains forbidden character {c:?}"
            )));
        }
    }

    Ok(segments)
}
