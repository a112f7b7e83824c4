//! Capability profiles
//!
//! A capability profile answers the questions that used to be scattered
//! platform checks: how to get the bytes of a fresh capture, what reference
//! to store and render for a saved photo, and whether loaded photos need
//! their contents inlined before a webview can show them.
//!
//! Two profiles cover the supported platforms:
//! - [`DirectAccessProfile`] - the webview can address stored files
//!   directly, so photos carry a resolved URI and load needs no file reads.
//! - [`MaterializingProfile`] - stored files are invisible to the webview,
//!   so captures are fetched over their webview URL and every load re-reads
//!   file contents into base64 data URLs.
//!
//! The store is constructed with one profile and never branches on platform
//! again.

use crate::core::error::Result;
use crate::core::photo::Photo;
use crate::platform::traits::{CapturedPhoto, FileStore, StorageDirectory, WebResources};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, trace};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;

/// Characters escaped when embedding a file path in a webview asset URL.
/// Everything outside RFC 3986 unreserved plus the path separator.
const ASSET_PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Scheme prefix the embedded webview serves local files under
const ASSET_PREFIX: &str = "asset://localhost/";

/// Convert a `file://` URI into the URL the webview can actually render
///
/// Non-file URIs (blob URLs, http, already-converted assets) pass through
/// unchanged.
pub fn convert_file_src(uri: &str) -> String {
    match uri.strip_prefix("file://") {
        Some(path) => {
            let trimmed = path.trim_start_matches('/');
            format!("{}{}", ASSET_PREFIX, utf8_percent_encode(trimmed, ASSET_PATH_SET))
        }
        None => uri.to_string(),
    }
}

/// Platform-specific photo handling, chosen once at store construction
#[async_trait]
pub trait CapabilityProfile: Send + Sync {
    /// Short stable identifier for logs
    fn name(&self) -> &'static str;

    /// Whether the webview can address stored files without inlining
    fn direct_file_access(&self) -> bool;

    /// Read the raw bytes of a fresh capture
    async fn capture_contents(&self, captured: &CapturedPhoto) -> Result<Vec<u8>>;

    /// Build the gallery entry for a capture just saved under `file_name`
    async fn renderable_reference(&self, captured: &CapturedPhoto, file_name: &str)
        -> Result<Photo>;

    /// Fill in whatever loaded photos need before they can render
    async fn materialize(&self, photos: &mut [Photo]) -> Result<()>;
}

/// Profile for platforms where the webview reads stored files directly
///
/// Stored photos carry their resolved `file://` URI as identity and a
/// converted asset URL for rendering. Loading is cheap: no file contents
/// are touched.
pub struct DirectAccessProfile {
    files: Arc<dyn FileStore>,
}

impl DirectAccessProfile {
    /// Create a profile reading captures and resolving URIs through `files`
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl CapabilityProfile for DirectAccessProfile {
    fn name(&self) -> &'static str {
        "direct-access"
    }

    fn direct_file_access(&self) -> bool {
        true
    }

    async fn capture_contents(&self, captured: &CapturedPhoto) -> Result<Vec<u8>> {
        let path = captured.require_source_path()?;
        trace!("Reading capture staging file: {}", path.display());
        self.files.read_external(path).await
    }

    async fn renderable_reference(
        &self,
        _captured: &CapturedPhoto,
        file_name: &str,
    ) -> Result<Photo> {
        let uri = self
            .files
            .resolve_uri(file_name, StorageDirectory::Data)
            .await?;
        let display = convert_file_src(&uri);
        debug!("Saved photo resolves to {} (render as {})", uri, display);
        Ok(Photo::new(uri).with_display_path(display))
    }

    async fn materialize(&self, _photos: &mut [Photo]) -> Result<()> {
        // Stored URIs render as-is
        Ok(())
    }
}

/// Profile for platforms where stored files must be inlined to render
///
/// Captures are only reachable through their webview URL, and loaded photos
/// get a base64 data URL rebuilt from Data storage before publication.
pub struct MaterializingProfile {
    files: Arc<dyn FileStore>,
    web: Arc<dyn WebResources>,
}

impl MaterializingProfile {
    /// Create a profile fetching captures through `web` and re-reading
    /// stored photos through `files`
    pub fn new(files: Arc<dyn FileStore>, web: Arc<dyn WebResources>) -> Self {
        Self { files, web }
    }
}

#[async_trait]
impl CapabilityProfile for MaterializingProfile {
    fn name(&self) -> &'static str {
        "materializing"
    }

    fn direct_file_access(&self) -> bool {
        false
    }

    async fn capture_contents(&self, captured: &CapturedPhoto) -> Result<Vec<u8>> {
        let url = captured.require_web_path()?;
        trace!("Fetching capture contents from {}", url);
        self.web.fetch(url).await
    }

    async fn renderable_reference(
        &self,
        captured: &CapturedPhoto,
        file_name: &str,
    ) -> Result<Photo> {
        // The capture's own webview URL stays renderable for this session;
        // the next load re-derives inline data from the saved file.
        let mut photo = Photo::new(file_name);
        photo.display_path = captured.web_path.clone();
        Ok(photo)
    }

    async fn materialize(&self, photos: &mut [Photo]) -> Result<()> {
        for photo in photos.iter_mut() {
            let bytes = self
                .files
                .read(&photo.filepath, StorageDirectory::Data)
                .await?;
            photo.inline_data = Some(format!(
                "data:image/jpeg;base64,{}",
                STANDARD.encode(&bytes)
            ));
        }
        debug!("Materialized {} photo(s) into data URLs", photos.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GalleryError;
    use crate::testkit::mocks::{MockFileStore, MockWebResources};

    #[test]
    fn test_convert_file_src_encodes_path() {
        assert_eq!(
            convert_file_src("file:///data/167.jpeg"),
            "asset://localhost/data/167.jpeg"
        );
        assert_eq!(
            convert_file_src("file:///data/my photo.jpeg"),
            "asset://localhost/data/my%20photo.jpeg"
        );
    }

    #[test]
    fn test_convert_file_src_passes_through_other_schemes() {
        assert_eq!(
            convert_file_src("blob:https://localhost/abc"),
            "blob:https://localhost/abc"
        );
        assert_eq!(
            convert_file_src("asset://localhost/data/a.jpeg"),
            "asset://localhost/data/a.jpeg"
        );
    }

    #[tokio::test]
    async fn test_direct_profile_reads_capture_from_staging_path() {
        let files = Arc::new(
            MockFileStore::new().with_external_file("/tmp/staging/cap.jpeg", b"raw-jpeg".to_vec()),
        );
        let profile = DirectAccessProfile::new(files);

        let captured = CapturedPhoto::from_source_path("/tmp/staging/cap.jpeg");
        let bytes = profile.capture_contents(&captured).await.unwrap();
        assert_eq!(bytes, b"raw-jpeg");
    }

    #[tokio::test]
    async fn test_direct_profile_requires_source_path() {
        let profile = DirectAccessProfile::new(Arc::new(MockFileStore::new()));
        let captured = CapturedPhoto::from_web_path("blob:https://localhost/abc");

        let err = profile.capture_contents(&captured).await.unwrap_err();
        assert!(matches!(err, GalleryError::MissingCaptureSource(_)));
    }

    #[tokio::test]
    async fn test_direct_profile_reference_converts_resolved_uri() {
        let files = Arc::new(
            MockFileStore::new().with_resolved_uri("167.jpeg", "file:///data/167.jpeg"),
        );
        let profile = DirectAccessProfile::new(files);

        let captured = CapturedPhoto::from_source_path("/tmp/cap.jpeg");
        let photo = profile
            .renderable_reference(&captured, "167.jpeg")
            .await
            .unwrap();

        assert_eq!(photo.filepath, "file:///data/167.jpeg");
        assert_eq!(
            photo.display_path.as_deref(),
            Some("asset://localhost/data/167.jpeg")
        );
        assert_eq!(photo.inline_data, None);
    }

    #[tokio::test]
    async fn test_direct_profile_materialize_is_noop() {
        let profile = DirectAccessProfile::new(Arc::new(MockFileStore::new()));
        let mut photos = vec![Photo::new("file:///data/a.jpeg")];
        profile.materialize(&mut photos).await.unwrap();
        assert_eq!(photos[0].inline_data, None);
    }

    #[tokio::test]
    async fn test_materializing_profile_fetches_capture_over_web() {
        let web = Arc::new(
            MockWebResources::new().with_resource("blob:https://localhost/abc", b"web-jpeg".to_vec()),
        );
        let profile = MaterializingProfile::new(Arc::new(MockFileStore::new()), web);

        let captured = CapturedPhoto::from_web_path("blob:https://localhost/abc");
        let bytes = profile.capture_contents(&captured).await.unwrap();
        assert_eq!(bytes, b"web-jpeg");
    }

    #[tokio::test]
    async fn test_materializing_profile_reference_keeps_web_path() {
        let profile = MaterializingProfile::new(
            Arc::new(MockFileStore::new()),
            Arc::new(MockWebResources::new()),
        );

        let captured = CapturedPhoto::from_web_path("blob:https://localhost/abc");
        let photo = profile
            .renderable_reference(&captured, "167.jpeg")
            .await
            .unwrap();

        assert_eq!(photo.filepath, "167.jpeg");
        assert_eq!(photo.display_path.as_deref(), Some("blob:https://localhost/abc"));
    }

    #[tokio::test]
    async fn test_materializing_profile_inlines_stored_bytes() {
        let files = Arc::new(
            MockFileStore::new().with_file("a.jpeg", StorageDirectory::Data, b"foo".to_vec()),
        );
        let profile = MaterializingProfile::new(files, Arc::new(MockWebResources::new()));

        let mut photos = vec![Photo::new("a.jpeg")];
        profile.materialize(&mut photos).await.unwrap();

        assert_eq!(
            photos[0].inline_data.as_deref(),
            Some("data:image/jpeg;base64,Zm9v")
        );
    }

    #[tokio::test]
    async fn test_materializing_profile_propagates_missing_file() {
        let profile = MaterializingProfile::new(
            Arc::new(MockFileStore::new()),
            Arc::new(MockWebResources::new()),
        );

        let mut photos = vec![Photo::new("missing.jpeg")];
        let err = profile.materialize(&mut photos).await.unwrap_err();
        assert!(matches!(err, GalleryError::NotFound(_)));
    }
}
