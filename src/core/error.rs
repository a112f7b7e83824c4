//! Error types for the camera roll gallery
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Main error type for gallery operations
#[derive(Error, Debug)]
pub enum GalleryError {
    /// The user dismissed the camera without taking a photo
    #[error("Capture cancelled. No photo was selected.")]
    CaptureCancelled,

    /// Camera or photo-library permission was denied
    #[error("Permission denied. Please allow camera and photo access in system settings.")]
    PermissionDenied,

    /// General camera failure while capturing
    #[error("Camera error: {0}")]
    Camera(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(String),

    /// A file or stored entry could not be found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Key-value preference storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted photo manifest could not be encoded or decoded
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Fetching photo contents over a webview URL failed
    #[error("Fetch failed for '{url}': {message}")]
    Fetch { url: String, message: String },

    /// A captured photo was missing the reference this profile requires
    #[error("Captured photo has no {0}")]
    MissingCaptureSource(&'static str),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GalleryError>;

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        GalleryError::Io(err.to_string())
    }
}
