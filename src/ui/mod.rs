//! UI Support Module
//!
//! This module provides the infrastructure needed for building a graphical
//! frontend for the camera-roll gallery. It is designed to be UI-framework
//! agnostic, providing building blocks that can be used with any Rust UI
//! framework (egui, iced, Tauri, slint, etc.).
//!
//! # Architecture
//!
//! The UI module is organized into several submodules:
//!
//! - [`events`] - Thread-safe event types for communication between the
//!   store and UI
//! - [`controller`] - Gallery controller running operations on a background
//!   runtime
//! - [`view`] - View models for the photo grid and the delete-confirmation
//!   sheet
//! - [`preview`] - Thumbnail generation and caching
//!
//! # Threading Model
//!
//! The UI module uses a channel-based architecture for thread safety:
//!
//! 1. **Event Channels** - Background operations emit events through channels
//!    that the UI can poll without blocking
//! 2. **Atomic State** - In-flight operation counts use atomic operations
//!    for lock-free status checks
//! 3. **Shared Store** - The store behind the controller can be read from
//!    any thread for the current gallery and selection
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use camera_roll::core::config::Config;
//! use camera_roll::core::store::{PhotoGalleryStore, StoreSettings};
//! use camera_roll::platform::{
//!     DirectAccessProfile, FileImportCamera, JsonPreferenceStore, LocalFileStore,
//! };
//! use camera_roll::ui::{ActionSheetState, GalleryController, GalleryGrid, UiEvent};
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let files = Arc::new(LocalFileStore::open(config.storage.effective_root()).unwrap());
//! let prefs = Arc::new(JsonPreferenceStore::open(config.storage.preferences_path()).unwrap());
//! let camera = Arc::new(FileImportCamera::new());
//! let profile = Arc::new(DirectAccessProfile::new(files.clone()));
//!
//! let store = Arc::new(PhotoGalleryStore::new(
//!     camera,
//!     files,
//!     prefs,
//!     profile,
//!     StoreSettings::from_config(&config),
//! ));
//! let controller = GalleryController::new(store).unwrap();
//!
//! // Kick off the initial load
//! controller.load_saved();
//!
//! // UI event loop (pseudo-code)
//! loop {
//!     while let Some(event) = controller.try_recv_event() {
//!         match event {
//!             UiEvent::Gallery(gallery_event) => {
//!                 // Update the grid, show errors, close the sheet, ...
//!             }
//!             _ => {}
//!         }
//!     }
//!
//!     // Rebuild the view models from current state
//!     let grid = GalleryGrid::new(&controller.photos());
//!     let sheet = ActionSheetState::for_pending(controller.pending_delete().as_ref());
//!
//!     # break; // Exit for doctest
//! }
//! ```

pub mod controller;
pub mod events;
pub mod preview;
pub mod view;

// Re-export main types for convenience
pub use controller::GalleryController;

pub use events::{format_bytes, format_duration, AppEvent, GalleryEvent, LogLevel, UiEvent};

pub use preview::{
    CacheStats, Thumbnail, ThumbnailCache, ThumbnailConfig, ThumbnailGenerator, ThumbnailResult,
};

pub use view::{ActionSheetState, ButtonRole, GalleryGrid, GridCell, RenderSource, SheetButton};
