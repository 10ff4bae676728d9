//! Uploaded media assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Gateway identifier.
    pub id: String,
    /// Original file name.
    pub filename: String,
    /// Public URL of the stored file.
    pub url: String,
    /// MIME type.
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Guesses a MIME type from a file name's extension.
#[must_use]
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_types() {
        assert_eq!(content_type_for("Logo.PNG"), "image/png");
        assert_eq!(content_type_for("reel.mp4"), "video/mp4");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
