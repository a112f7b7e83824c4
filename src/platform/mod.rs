//! Platform collaborator module
//!
//! This module provides the seams between the gallery core and whatever
//! platform it runs on: camera capture, sandbox file storage, key-value
//! preferences, and webview resource fetches.
//!
//! # Submodules
//!
//! - `traits` - Collaborator contracts (camera, files, preferences, web)
//! - `profile` - Capability profiles that package platform differences
//! - `local` - Desktop implementations backed by local directories
//!
//! # Architecture
//!
//! The gallery store only ever sees trait objects:
//!
//! - `Camera` / `FileStore` / `PreferenceStore` / `WebResources` - the raw
//!   platform capabilities
//! - `CapabilityProfile` - one injected object that knows how captures are
//!   read, referenced, and rendered on the current platform
//!
//! Real implementations, desktop stand-ins, and test mocks all satisfy the
//! same traits, so the pipeline runs unchanged against any of them.

pub mod local;
pub mod profile;
pub mod traits;

// Re-export commonly used types for convenience
pub use traits::{
    Camera, CameraResultKind, CameraSource, CaptureRequest, CapturedPhoto, FileStore,
    PreferenceStore, StorageDirectory, WebResources,
};

pub use profile::{convert_file_src, CapabilityProfile, DirectAccessProfile, MaterializingProfile};

pub use local::{FileImportCamera, JsonPreferenceStore, LocalFileStore};
