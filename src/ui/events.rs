//! UI Events Module
//!
//! Defines thread-safe event types for communication between the gallery
//! store and UI frontends. These events are designed to be sent through
//! channels and consumed by any UI framework.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::photo::Photo;

// =============================================================================
// Gallery Events
// =============================================================================

/// Events emitted while gallery operations run
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// Restoring the gallery from storage has started
    LoadStarted,

    /// The gallery was restored from storage
    LoadCompleted {
        /// Photos as published, newest first
        photos: Vec<Photo>,
        /// Time taken to load and materialize
        duration: Duration,
    },

    /// Restoring the gallery failed
    LoadFailed {
        /// Error message
        error: String,
    },

    /// A capture has been handed to the camera
    CaptureStarted,

    /// A capture was saved and published
    CaptureCompleted {
        /// The photo as it entered the gallery
        photo: Photo,
        /// Gallery size after the capture
        total: usize,
    },

    /// A capture did not make it into the gallery
    CaptureFailed {
        /// Error message
        error: String,
        /// Whether the user backed out rather than hit an error
        cancelled: bool,
    },

    /// A photo was deleted from storage and the gallery
    DeleteCompleted {
        /// Filepath of the removed photo
        filepath: String,
        /// Gallery size after the deletion
        remaining: usize,
    },

    /// Deleting a photo failed
    DeleteFailed {
        /// Filepath of the photo that was being deleted
        filepath: String,
        /// Error message
        error: String,
    },

    /// The photo selected for deletion changed
    SelectionChanged {
        /// The pending photo, or `None` once the sheet is closed
        pending: Option<Photo>,
    },
}

// =============================================================================
// Application Events
// =============================================================================

/// General application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Configuration was loaded
    ConfigLoaded {
        /// Path to config file
        path: PathBuf,
    },

    /// Configuration error
    ConfigError {
        /// Error message
        error: String,
    },

    /// Application is shutting down
    ShuttingDown,

    /// Log message for UI display
    Log {
        /// Log level
        level: LogLevel,
        /// Message
        message: String,
        /// Optional context/source
        source: Option<String>,
    },
}

/// Log levels for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational message
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

// =============================================================================
// Combined Event Type
// =============================================================================

/// All possible events that can be sent to the UI
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Gallery-related event
    Gallery(GalleryEvent),
    /// Application-related event
    App(AppEvent),
}

impl From<GalleryEvent> for UiEvent {
    fn from(event: GalleryEvent) -> Self {
        UiEvent::Gallery(event)
    }
}

impl From<AppEvent> for UiEvent {
    fn from(event: AppEvent) -> Self {
        UiEvent::App(event)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// =============================================================================
// Tests
// =============================================================================
