//! Field validators. Each returns `Some(message)` when the value is rejected.

use base64::{Engine as _, engine};

/// Largest accepted photo, measured on the decoded bytes.
pub const MAX_PHOTO_BYTES: usize = 4 * 1024 * 1024;

/// Validate a required text field with a max length (in characters).
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Required text with both a lower and upper bound.
pub fn validate_length(value: &str, field_name: &str, min_len: usize, max_len: usize) -> Option<String> {
    if let Some(err) = validate_required(value, field_name, max_len) {
        return Some(err);
    }
    if value.trim().chars().count() < min_len {
        return Some(format!("{field_name} must be at least {min_len} characters"));
    }
    None
}

/// Validate an optional photo given as a `data:image/<type>;base64,<payload>` URI.
/// Empty input means "no photo" and is accepted.
pub fn validate_photo(data_uri: &str) -> Option<String> {
    let data_uri = data_uri.trim();
    if data_uri.is_empty() {
        return None;
    }
    let Some(rest) = data_uri.strip_prefix("data:image/") else {
        return Some("Photo must be an image".to_string());
    };
    let Some((_, payload)) = rest.split_once(";base64,") else {
        return Some("Photo must be base64 encoded".to_string());
    };
    match engine::general_purpose::STANDARD.decode(payload) {
        Err(_) => Some("Photo data is corrupted".to_string()),
        Ok(bytes) if bytes.len() > MAX_PHOTO_BYTES => Some("Photo must be 4 MB or smaller".to_string()),
        Ok(_) => None,
    }
}
