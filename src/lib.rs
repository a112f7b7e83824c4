//! Camera Roll Library
//!
//! A small photo gallery manager: capture photos into a managed storage root,
//! keep a newest-first manifest of them in a preference file, and delete them
//! behind a confirmation step.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Core functionality including configuration, error handling,
//!   the photo model, and the gallery store
//! - [`platform`] - Platform abstraction traits (camera, file storage,
//!   preferences, capability profiles) plus local-filesystem backends
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testkit`] - Mock platform backends and scripted gallery journeys
//!   for testing without a camera
//! - [`ui`] - UI support module with an async controller, view models, and
//!   previews
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use camera_roll::core::config::Config;
//! use camera_roll::core::store::{PhotoGalleryStore, StoreSettings};
//! use camera_roll::platform::{
//!     DirectAccessProfile, FileImportCamera, JsonPreferenceStore, LocalFileStore,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load_default()?;
//!
//!     // Wire up the local platform backends
//!     let files = Arc::new(LocalFileStore::open(config.storage.effective_root())?);
//!     let prefs = Arc::new(JsonPreferenceStore::open(config.storage.preferences_path())?);
//!     let camera = Arc::new(FileImportCamera::new());
//!     let profile = Arc::new(DirectAccessProfile::new(files.clone()));
//!
//!     let store = PhotoGalleryStore::new(
//!         camera,
//!         files,
//!         prefs,
//!         profile,
//!         StoreSettings::from_config(&config),
//!     );
//!
//!     // Load the persisted gallery
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let photos = runtime.block_on(store.load_saved())?;
//!     println!("Gallery holds {} photos", photos.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # UI Integration
//!
//! The `ui` module provides everything needed to build a graphical interface:
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
//!
//! // Create controller for running gallery operations off the UI thread
//! let controller = GalleryController::new(store).unwrap();
//! controller.load_saved();
//!
//! // Poll for events in your UI loop
//! while let Some(event) = controller.try_recv_event() {
//!     match event {
//!         UiEvent::Gallery(gallery) => { /* update grid, close sheet */ }
//!         UiEvent::App(app) => { /* handle app events */ }
//!     }
//!
//!     // Rebuild the view models from current state
//!     let grid = GalleryGrid::new(&controller.photos());
//!     let sheet = ActionSheetState::for_pending(controller.pending_delete().as_ref());
//!     # break;
//! }
//! ```
//!
//! # Testing Without a Camera
//!
//! The `testkit` module provides comprehensive testing capabilities:
//!
//! ```rust,no_run
//! use camera_roll::testkit::JourneyRunner;
//!
//! // Run all quick journeys
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let mut runner = JourneyRunner::new();
//! let summary = runtime.block_on(runner.run_quick());
//! println!("Passed: {}/{}", summary.passed, summary.total);
//!
//! // List available scenarios
//! camera_roll::testkit::print_available_scenarios();
//! ```
//!
//! # Features
//!
//! - **Persisted Manifest** - Newest-first photo list stored under a
//!   configurable key in a JSON preference file
//! - **Confirmed Deletion** - Two-step delete flow backed by a
//!   confirmation-sheet view model
//! - **Capability Profiles** - Direct file-path display or materialized
//!   inline data, chosen per platform at wiring time
//! - **File Import Capture** - Treat existing image files as camera captures
//! - **Comprehensive Testing** - Mock camera and storage with scripted
//!   journeys and expected outcomes
//! - **UI Ready** - Async controller and event system for GUI integration
//! - **Preview Support** - Thumbnail generation infrastructure for photo
//!   previews
//!
//! # Platform Support
//!
//! The local backends run anywhere with a standard filesystem. Frontends that
//! cannot display raw file paths (webview-style shells) use the materializing
//! profile, which inlines photo bytes as base64 instead of handing out paths.

// Core modules - always available
pub mod cli;
pub mod core;
pub mod platform;
pub mod testkit;
pub mod ui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
