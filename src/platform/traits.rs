//! Platform abstraction traits for testability
//!
//! This module defines traits that abstract the platform collaborators the
//! gallery depends on, allowing both real implementations (camera hardware,
//! app-sandbox filesystem, preference storage) and mocks to be used
//! interchangeably. This enables comprehensive testing of the gallery
//! pipeline without a device or a webview.
//!
//! # Architecture
//!
//! The trait set is:
//! - `Camera` - Captures a photo and returns a reference to it
//! - `FileStore` - Reads, writes, and deletes files in app storage
//! - `PreferenceStore` - Persists small string values under keys
//! - `WebResources` - Fetches bytes addressed by a webview URL
//!
//! All traits are async: every operation crosses a platform bridge (or disk)
//! and callers await completion without holding locks.
//!
//! # Example Usage
//!
//! ```rust
//! use camera_roll::platform::{CameraSource, CaptureRequest};
//!
//! let request = CaptureRequest::new().with_quality(90);
//! assert_eq!(request.source, CameraSource::Camera);
//! assert_eq!(request.quality, 90);
//! ```

use crate::core::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// How the camera should return the captured photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraResultKind {
    /// Return a reference (native path and/or webview URL) to a temp file
    #[default]
    Uri,
    /// Return raw base64 contents
    Base64,
    /// Return a `data:` URL with inline contents
    DataUrl,
}

/// Where the camera should source the photo from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSource {
    /// Take a new photo with the rear camera
    #[default]
    Camera,
    /// Pick an existing photo from the library
    Photos,
    /// Ask the user which of the two they want
    Prompt,
}

impl CameraSource {
    /// Get a human-readable name for this source
    pub fn display_name(&self) -> &'static str {
        match self {
            CameraSource::Camera => "Camera",
            CameraSource::Photos => "Photo Library",
            CameraSource::Prompt => "Prompt",
        }
    }
}

impl Display for CameraSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Well-known app storage directories
///
/// Mirrors the storage areas a mobile app sandbox exposes. Gallery photos
/// live in `Data`; the others are available to file-store implementations
/// for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageDirectory {
    /// Durable app data; survives restarts, backed up
    #[default]
    Data,
    /// Scratch space the OS may reclaim
    Cache,
    /// User-visible documents
    Documents,
}

impl StorageDirectory {
    /// Directory name used when mapping onto a real filesystem
    pub fn dir_name(&self) -> &'static str {
        match self {
            StorageDirectory::Data => "data",
            StorageDirectory::Cache => "cache",
            StorageDirectory::Documents => "documents",
        }
    }

    /// Get a human-readable name for this directory
    pub fn display_name(&self) -> &'static str {
        match self {
            StorageDirectory::Data => "Data",
            StorageDirectory::Cache => "Cache",
            StorageDirectory::Documents => "Documents",
        }
    }
}

impl Display for StorageDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Options for a single capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// How the result should be returned
    pub result_kind: CameraResultKind,
    /// Where the photo comes from
    pub source: CameraSource,
    /// JPEG quality, 0-100
    pub quality: u8,
}

impl CaptureRequest {
    /// Create a request with the gallery defaults: URI result, rear camera,
    /// full quality
    pub fn new() -> Self {
        Self {
            result_kind: CameraResultKind::Uri,
            source: CameraSource::Camera,
            quality: 100,
        }
    }

    /// Set the capture source (builder style)
    pub fn with_source(mut self, source: CameraSource) -> Self {
        self.source = source;
        self
    }

    /// Set the JPEG quality (builder style)
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A freshly captured photo, referenced but not yet saved
///
/// Which reference is present depends on the platform: native captures carry
/// a `source_path` into the camera's temp storage, webview captures carry a
/// `web_path` URL, and some platforms provide both.
#[derive(Debug, Clone, Default)]
pub struct CapturedPhoto {
    /// Native filesystem path to the temp file, if the platform exposes one
    pub source_path: Option<PathBuf>,
    /// Webview-servable URL for the temp photo, if the platform exposes one
    pub web_path: Option<String>,
}

impl CapturedPhoto {
    /// Create a capture result with only a native path
    pub fn from_source_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: Some(path.into()),
            web_path: None,
        }
    }

    /// Create a capture result with only a webview URL
    pub fn from_web_path(url: impl Into<String>) -> Self {
        Self {
            source_path: None,
            web_path: Some(url.into()),
        }
    }

    /// Set the webview URL (builder style)
    pub fn with_web_path(mut self, url: impl Into<String>) -> Self {
        self.web_path = Some(url.into());
        self
    }

    /// The native path, or an error naming the missing reference
    pub fn require_source_path(&self) -> Result<&Path> {
        self.source_path
            .as_deref()
            .ok_or(crate::core::error::GalleryError::MissingCaptureSource(
                "source path",
            ))
    }

    /// The webview URL, or an error naming the missing reference
    pub fn require_web_path(&self) -> Result<&str> {
        self.web_path
            .as_deref()
            .ok_or(crate::core::error::GalleryError::MissingCaptureSource(
                "web path",
            ))
    }
}

/// Trait for photo capture
///
/// Implementations drive the platform camera (or a stand-in) and hand back a
/// reference to the captured temp file. Saving it into gallery storage is the
/// caller's job.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Capture one photo
    ///
    /// # Arguments
    /// * `request` - Source, result kind, and quality options
    ///
    /// # Returns
    /// A reference to the captured photo, or `CaptureCancelled` if the user
    /// backed out without taking one
    async fn get_photo(&self, request: CaptureRequest) -> Result<CapturedPhoto>;
}

/// Trait for app-sandbox file storage
///
/// Named entries live inside well-known storage directories; `read_external`
/// is the escape hatch for absolute paths outside the sandbox (the camera's
/// temp files).
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write a file into a storage directory, replacing any existing entry
    ///
    /// # Arguments
    /// * `name` - Bare file name within the directory
    /// * `directory` - Which storage directory to write into
    /// * `data` - Raw file contents
    async fn write(&self, name: &str, directory: StorageDirectory, data: &[u8]) -> Result<()>;

    /// Read a file from a storage directory
    ///
    /// # Arguments
    /// * `name` - Bare file name within the directory
    /// * `directory` - Which storage directory to read from
    ///
    /// # Returns
    /// The raw bytes of the file content
    async fn read(&self, name: &str, directory: StorageDirectory) -> Result<Vec<u8>>;

    /// Read a file by absolute path outside the storage directories
    ///
    /// # Arguments
    /// * `path` - Full native path (e.g., a camera temp file)
    async fn read_external(&self, path: &Path) -> Result<Vec<u8>>;

    /// Resolve a stored file to the platform URI that addresses it
    ///
    /// # Arguments
    /// * `name` - Bare file name within the directory
    /// * `directory` - Which storage directory the file lives in
    ///
    /// # Returns
    /// A URI string (e.g., `file:///...`) for the stored file
    async fn resolve_uri(&self, name: &str, directory: StorageDirectory) -> Result<String>;

    /// Delete a file from a storage directory
    ///
    /// # Arguments
    /// * `name` - Bare file name within the directory
    /// * `directory` - Which storage directory to delete from
    async fn delete(&self, name: &str, directory: StorageDirectory) -> Result<()>;
}

/// Trait for key-value preference storage
///
/// Small string values under string keys; the gallery stores its entire
/// photo manifest as one JSON value under a single key.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Get the value stored under a key
    ///
    /// # Returns
    /// `Ok(None)` if the key has never been set
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Trait for fetching bytes addressed by a webview URL
///
/// Used on platforms where a capture is only reachable through the webview
/// (blob or served URLs) rather than a native path.
#[async_trait]
pub trait WebResources: Send + Sync {
    /// Fetch the contents behind a URL
    ///
    /// # Arguments
    /// * `url` - The webview URL of the resource
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GalleryError;

    #[test]
    fn test_capture_request_defaults() {
        let request = CaptureRequest::new();
        assert_eq!(request.result_kind, CameraResultKind::Uri);
        assert_eq!(request.source, CameraSource::Camera);
        assert_eq!(request.quality, 100);
        assert_eq!(CaptureRequest::default(), request);
    }

    #[test]
    fn test_capture_request_builders() {
        let request = CaptureRequest::new()
            .with_source(CameraSource::Prompt)
            .with_quality(80);
        assert_eq!(request.source, CameraSource::Prompt);
        assert_eq!(request.quality, 80);

        let capped = CaptureRequest::new().with_quality(255);
        assert_eq!(capped.quality, 100);
    }

    #[test]
    fn test_storage_directory_names() {
        assert_eq!(StorageDirectory::Data.dir_name(), "data");
        assert_eq!(StorageDirectory::Cache.dir_name(), "cache");
        assert_eq!(StorageDirectory::Documents.dir_name(), "documents");

        assert_eq!(format!("{}", StorageDirectory::Data), "Data");
        assert_eq!(format!("{}", StorageDirectory::Documents), "Documents");
    }

    #[test]
    fn test_camera_source_display() {
        assert_eq!(CameraSource::Camera.display_name(), "Camera");
        assert_eq!(CameraSource::Photos.display_name(), "Photo Library");
        assert_eq!(format!("{}", CameraSource::Prompt), "Prompt");
    }

    #[test]
    fn test_captured_photo_required_references() {
        let native = CapturedPhoto::from_source_path("/tmp/capture.jpeg");
        assert!(native.require_source_path().is_ok());
        assert!(matches!(
            native.require_web_path(),
            Err(GalleryError::MissingCaptureSource("web path"))
        ));

        let web = CapturedPhoto::from_web_path("blob:https://localhost/abc");
        assert!(web.require_web_path().is_ok());
        assert!(matches!(
            web.require_source_path(),
            Err(GalleryError::MissingCaptureSource("source path"))
        ));
    }

    #[test]
    fn test_captured_photo_with_both_references() {
        let both = CapturedPhoto::from_source_path("/tmp/capture.jpeg")
            .with_web_path("asset://localhost/tmp/capture.jpeg");
        assert!(both.require_source_path().is_ok());
        assert!(both.require_web_path().is_ok());
    }

    #[test]
    fn test_camera_source_config_parsing() {
        let parsed: CameraSource = serde_json::from_str("\"photos\"").unwrap();
        assert_eq!(parsed, CameraSource::Photos);
        let parsed: CameraSource = serde_json::from_str("\"prompt\"").unwrap();
        assert_eq!(parsed, CameraSource::Prompt);
    }
}
