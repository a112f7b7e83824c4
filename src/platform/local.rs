//! Desktop implementations of the platform collaborators
//!
//! On a mobile device these capabilities come from platform plugins; on a
//! desktop host the same contracts are served by plain directories and
//! files:
//!
//! - [`LocalFileStore`] - storage directories as subdirectories of one root
//! - [`JsonPreferenceStore`] - key-value preferences in a single JSON file
//! - [`FileImportCamera`] - "captures" by handing out queued local images
//!
//! These back the CLI and double as realistic integration-test subjects.

use crate::core::error::{GalleryError, Result};
use crate::platform::traits::{
    Camera, CaptureRequest, CapturedPhoto, FileStore, PreferenceStore, StorageDirectory,
};
use async_trait::async_trait;
use log::{debug, trace};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Characters escaped when embedding a native path in a `file://` URI
const FILE_URI_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build a `file://` URI from an absolute native path
fn path_to_file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let trimmed = raw.trim_start_matches('/');
    format!("file:///{}", utf8_percent_encode(trimmed, FILE_URI_SET))
}

// ============================================================================
// LocalFileStore
// ============================================================================

/// File storage backed by subdirectories of a single root directory
///
/// Each [`StorageDirectory`] maps onto `<root>/<dir_name>/`; the
/// subdirectories are created when the store is opened.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Open a store rooted at `root`, creating the storage subdirectories
    /// if they are missing
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for directory in [
            StorageDirectory::Data,
            StorageDirectory::Cache,
            StorageDirectory::Documents,
        ] {
            std::fs::create_dir_all(root.join(directory.dir_name()))?;
        }
        debug!("Opened local file store at {}", root.display());
        Ok(Self { root })
    }

    /// The root directory this store lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, name: &str, directory: StorageDirectory) -> PathBuf {
        self.root.join(directory.dir_name()).join(name)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, name: &str, directory: StorageDirectory, data: &[u8]) -> Result<()> {
        let path = self.entry_path(name, directory);
        trace!("Writing {} byte(s) to {}", data.len(), path.display());
        tokio::fs::write(&path, data).await?;
        Ok(())
    }

    async fn read(&self, name: &str, directory: StorageDirectory) -> Result<Vec<u8>> {
        let path = self.entry_path(name, directory);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(GalleryError::NotFound(format!(
                "{} in {}",
                name, directory
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_external(&self, path: &Path) -> Result<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(GalleryError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_uri(&self, name: &str, directory: StorageDirectory) -> Result<String> {
        let path = self.entry_path(name, directory);
        let canonical = tokio::fs::canonicalize(&path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                GalleryError::NotFound(format!("{} in {}", name, directory))
            } else {
                e.into()
            }
        })?;
        Ok(path_to_file_uri(&canonical))
    }

    async fn delete(&self, name: &str, directory: StorageDirectory) -> Result<()> {
        let path = self.entry_path(name, directory);
        trace!("Deleting {}", path.display());
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(GalleryError::NotFound(format!(
                "{} in {}",
                name, directory
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// JsonPreferenceStore
// ============================================================================

/// Preference storage as a single JSON object file
///
/// The file is read once when the store is opened and rewritten wholesale on
/// every `set`, matching the last-write-wins contract.
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl JsonPreferenceStore {
    /// Open (or create) the preference file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            HashMap::new()
        };

        debug!(
            "Opened preference store at {} ({} key(s))",
            path.display(),
            values.len()
        );
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Where the preference file lives
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // Snapshot under the lock, write to disk outside it
        let snapshot = {
            let mut values = self.values.write().unwrap();
            values.insert(key.to_string(), value.to_string());
            values.clone()
        };
        let raw = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

// ============================================================================
// FileImportCamera
// ============================================================================

/// A camera that "captures" queued local image files
///
/// Each `get_photo` call takes the next queued path and returns it as both a
/// native staging path and a `file://` webview URL, so either capability
/// profile can consume it. An empty queue behaves like the user backing out
/// of the camera.
pub struct FileImportCamera {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl FileImportCamera {
    /// Create a camera with an empty queue
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a camera pre-loaded with paths to hand out in order
    pub fn with_queued(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: Mutex::new(paths.into_iter().collect()),
        }
    }

    /// Add a path to the back of the queue
    pub fn enqueue(&self, path: impl Into<PathBuf>) {
        self.queue.lock().unwrap().push_back(path.into());
    }

    /// Number of paths still queued
    pub fn queued(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

impl Default for FileImportCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Camera for FileImportCamera {
    async fn get_photo(&self, _request: CaptureRequest) -> Result<CapturedPhoto> {
        let path = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GalleryError::CaptureCancelled)?;

        if !path.is_file() {
            return Err(GalleryError::Camera(format!(
                "import file does not exist: {}",
                path.display()
            )));
        }

        let web_path = path_to_file_uri(&path);
        trace!("Import capture: {}", path.display());
        Ok(CapturedPhoto::from_source_path(path).with_web_path(web_path))
    }
}
