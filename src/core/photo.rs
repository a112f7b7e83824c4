//! Photo data model and manifest serialization
//!
//! A [`Photo`] is one gallery entry. Its `filepath` is the durable identity
//! used for lookups and deletion; the other fields are presentation hints
//! that a capability profile fills in for the current launch.
//!
//! The persisted manifest is a JSON array of photos stored under a single
//! preference key. Inline photo data is never written to the manifest; it is
//! rebuilt from disk on load where the platform requires it.
//!
//! ```rust
//! use camera_roll::core::photo::Photo;
//!
//! let photo = Photo::new("1717171717171.jpeg");
//! assert_eq!(photo.file_name(), "1717171717171.jpeg");
//! ```

use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// A single photo in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Stored file path or bare file name; the photo's identity
    pub filepath: String,

    /// Resolved URL a view layer can render directly (absent on platforms
    /// that must inline photo data instead)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_path: Option<String>,

    /// Base64 data URL rebuilt at load time; never persisted
    #[serde(skip)]
    pub inline_data: Option<String>,
}

impl Photo {
    /// Create a photo with only its stored path set
    pub fn new(filepath: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            display_path: None,
            inline_data: None,
        }
    }

    /// Set the renderable display path (builder style)
    pub fn with_display_path(mut self, display_path: impl Into<String>) -> Self {
        self.display_path = Some(display_path.into());
        self
    }

    /// Set the inline base64 data URL (builder style)
    pub fn with_inline_data(mut self, inline_data: impl Into<String>) -> Self {
        self.inline_data = Some(inline_data.into());
        self
    }

    /// Bare file name: everything after the last `/` in the stored path
    pub fn file_name(&self) -> &str {
        self.filepath.rsplit('/').next().unwrap_or(&self.filepath)
    }
}

/// Encode a photo list as the persisted JSON manifest
pub fn encode_manifest(photos: &[Photo]) -> Result<String> {
    Ok(serde_json::to_string(photos)?)
}

/// Decode a persisted JSON manifest back into a photo list
pub fn decode_manifest(raw: &str) -> Result<Vec<Photo>> {
    Ok(serde_json::from_str(raw)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_directories() {
        let photo = Photo::new("file:///data/photos/1717171717171.jpeg");
        assert_eq!(photo.file_name(), "1717171717171.jpeg");
    }

    #[test]
    fn test_file_name_of_bare_name_is_identity() {
        let photo = Photo::new("1717171717171.jpeg");
        assert_eq!(photo.file_name(), "1717171717171.jpeg");
    }

    #[test]
    fn test_manifest_never_contains_inline_data() {
        let photos = vec![
            Photo::new("a.jpeg").with_inline_data("data:image/jpeg;base64,Zm9v"),
            Photo::new("b.jpeg").with_display_path("file:///data/b.jpeg"),
        ];

        let raw = encode_manifest(&photos).unwrap();
        assert!(!raw.contains("inlineData"));
        assert!(!raw.contains("Zm9v"));
        assert!(raw.contains("displayPath"));
    }

    #[test]
    fn test_manifest_omits_absent_display_path() {
        let raw = encode_manifest(&[Photo::new("a.jpeg")]).unwrap();
        assert_eq!(raw, r#"[{"filepath":"a.jpeg"}]"#);
    }

    #[test]
    fn test_decode_tolerates_minimal_entries() {
        let photos = decode_manifest(r#"[{"filepath":"a.jpeg"}]"#).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].filepath, "a.jpeg");
        assert_eq!(photos[0].display_path, None);
        assert_eq!(photos[0].inline_data, None);
    }

    #[test]
    fn test_decode_round_trips_display_path() {
        let raw = r#"[{"filepath":"a.jpeg","displayPath":"file:///data/a.jpeg"}]"#;
        let photos = decode_manifest(raw).unwrap();
        assert_eq!(
            photos[0].display_path.as_deref(),
            Some("file:///data/a.jpeg")
        );
    }

    #[test]
    fn test_decode_rejects_malformed_manifest() {
        assert!(decode_manifest("not json").is_err());
    }
}
