//! Mock platform collaborators for testing without a device
//!
//! This module provides in-memory implementations of the platform traits
//! with configurable failure behavior and call logs, so every gallery flow
//! can be exercised deterministically.

use crate::core::error::{GalleryError, Result};
use crate::platform::traits::{
    Camera, CaptureRequest, CapturedPhoto, FileStore, PreferenceStore, StorageDirectory,
    WebResources,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ============================================================================
// MockCamera
// ============================================================================

/// A camera that hands out queued capture results
///
/// An empty queue behaves like the user dismissing the camera. Every request
/// is logged for later inspection.
pub struct MockCamera {
    captures: Mutex<VecDeque<CapturedPhoto>>,
    requests: Mutex<Vec<CaptureRequest>>,
    deny_permission: bool,
}

impl MockCamera {
    /// Create a camera with an empty capture queue
    pub fn new() -> Self {
        Self {
            captures: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            deny_permission: false,
        }
    }

    /// Queue a capture result (builder style)
    pub fn with_capture(self, captured: CapturedPhoto) -> Self {
        self.captures.lock().unwrap().push_back(captured);
        self
    }

    /// Deny permission on every capture attempt (builder style)
    pub fn with_permission_denied(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    /// Number of capture requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent capture request, if any
    pub fn last_request(&self) -> Option<CaptureRequest> {
        self.requests.lock().unwrap().last().copied()
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Camera for MockCamera {
    async fn get_photo(&self, request: CaptureRequest) -> Result<CapturedPhoto> {
        self.requests.lock().unwrap().push(request);

        if self.deny_permission {
            return Err(GalleryError::PermissionDenied);
        }

        self.captures
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GalleryError::CaptureCancelled)
    }
}

// ============================================================================
// MockFileStore
// ============================================================================

/// In-memory file storage with per-directory namespaces and call logs
pub struct MockFileStore {
    files: Mutex<HashMap<(StorageDirectory, String), Vec<u8>>>,
    external: Mutex<HashMap<PathBuf, Vec<u8>>>,
    resolved: Mutex<HashMap<String, String>>,
    written_log: Mutex<Vec<(String, StorageDirectory)>>,
    deleted_log: Mutex<Vec<(String, StorageDirectory)>>,
    fail_writes: bool,
    fail_deletes: bool,
    read_error_names: Vec<String>,
}

impl MockFileStore {
    /// Create an empty file store
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            external: Mutex::new(HashMap::new()),
            resolved: Mutex::new(HashMap::new()),
            written_log: Mutex::new(Vec::new()),
            deleted_log: Mutex::new(Vec::new()),
            fail_writes: false,
            fail_deletes: false,
            read_error_names: Vec::new(),
        }
    }

    /// Seed a stored file (builder style)
    pub fn with_file(self, name: &str, directory: StorageDirectory, data: Vec<u8>) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert((directory, name.to_string()), data);
        self
    }

    /// Seed a file outside the storage directories (builder style)
    pub fn with_external_file(self, path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        self.external.lock().unwrap().insert(path.into(), data);
        self
    }

    /// Override the URI a stored name resolves to (builder style)
    ///
    /// Names without an override resolve to
    /// `file:///<directory>/<name>`.
    pub fn with_resolved_uri(self, name: &str, uri: &str) -> Self {
        self.resolved
            .lock()
            .unwrap()
            .insert(name.to_string(), uri.to_string());
        self
    }

    /// Fail every write (builder style)
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Fail every delete (builder style)
    pub fn with_failing_delete(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Fail reads of a specific stored name (builder style)
    pub fn with_read_error(mut self, name: &str) -> Self {
        self.read_error_names.push(name.to_string());
        self
    }

    /// Whether a stored entry exists
    pub fn contains(&self, name: &str, directory: StorageDirectory) -> bool {
        self.files
            .lock()
            .unwrap()
            .contains_key(&(directory, name.to_string()))
    }

    /// Contents of a stored entry, if present
    pub fn file_contents(&self, name: &str, directory: StorageDirectory) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&(directory, name.to_string()))
            .cloned()
    }

    /// Names written to a directory, in write order
    pub fn written_names(&self, directory: StorageDirectory) -> Vec<String> {
        self.written_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, dir)| *dir == directory)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every delete call issued, in order (including failed ones)
    pub fn deleted(&self) -> Vec<(String, StorageDirectory)> {
        self.deleted_log.lock().unwrap().clone()
    }
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn write(&self, name: &str, directory: StorageDirectory, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(GalleryError::Io(format!(
                "simulated write failure: {}",
                name
            )));
        }

        self.files
            .lock()
            .unwrap()
            .insert((directory, name.to_string()), data.to_vec());
        self.written_log
            .lock()
            .unwrap()
            .push((name.to_string(), directory));
        Ok(())
    }

    async fn read(&self, name: &str, directory: StorageDirectory) -> Result<Vec<u8>> {
        if self.read_error_names.iter().any(|n| n == name) {
            return Err(GalleryError::Io(format!("simulated read error: {}", name)));
        }

        self.files
            .lock()
            .unwrap()
            .get(&(directory, name.to_string()))
            .cloned()
            .ok_or_else(|| GalleryError::NotFound(format!("{} in {}", name, directory)))
    }

    async fn read_external(&self, path: &Path) -> Result<Vec<u8>> {
        self.external
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| GalleryError::NotFound(path.display().to_string()))
    }

    async fn resolve_uri(&self, name: &str, directory: StorageDirectory) -> Result<String> {
        if let Some(uri) = self.resolved.lock().unwrap().get(name) {
            return Ok(uri.clone());
        }
        Ok(format!("file:///{}/{}", directory.dir_name(), name))
    }

    async fn delete(&self, name: &str, directory: StorageDirectory) -> Result<()> {
        self.deleted_log
            .lock()
            .unwrap()
            .push((name.to_string(), directory));

        if self.fail_deletes {
            return Err(GalleryError::Io(format!(
                "simulated delete failure: {}",
                name
            )));
        }

        match self
            .files
            .lock()
            .unwrap()
            .remove(&(directory, name.to_string()))
        {
            Some(_) => Ok(()),
            None => Err(GalleryError::NotFound(format!("{} in {}", name, directory))),
        }
    }
}

// ============================================================================
// MockPreferenceStore
// ============================================================================

/// In-memory key-value preferences with a set-call log
pub struct MockPreferenceStore {
    values: Mutex<HashMap<String, String>>,
    sets: Mutex<Vec<(String, String)>>,
    fail_set: bool,
}

impl MockPreferenceStore {
    /// Create an empty preference store
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            sets: Mutex::new(Vec::new()),
            fail_set: false,
        }
    }

    /// Seed a stored value (builder style)
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Fail every set (builder style)
    pub fn with_failing_set(mut self) -> Self {
        self.fail_set = true;
        self
    }

    /// Currently stored value under a key
    pub fn stored_value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Number of successful set calls
    pub fn set_calls(&self) -> usize {
        self.sets.lock().unwrap().len()
    }
}

impl Default for MockPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MockPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_set {
            return Err(GalleryError::Storage(format!(
                "simulated preference failure: {}",
                key
            )));
        }

        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.sets
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

// ============================================================================
// MockWebResources
// ============================================================================

/// In-memory webview resources addressed by URL
pub struct MockWebResources {
    resources: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockWebResources {
    /// Create an empty resource set
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a fetchable resource (builder style)
    pub fn with_resource(self, url: &str, data: Vec<u8>) -> Self {
        self.resources
            .lock()
            .unwrap()
            .insert(url.to_string(), data);
        self
    }
}

impl Default for MockWebResources {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebResources for MockWebResources {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.resources
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| GalleryError::Fetch {
                url: url.to_string(),
                message: "no such resource".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_camera_queue_and_log() {
        let camera = MockCamera::new()
            .with_capture(CapturedPhoto::from_source_path("/tmp/1.jpeg"))
            .with_capture(CapturedPhoto::from_source_path("/tmp/2.jpeg"));

        let first = camera.get_photo(CaptureRequest::new()).await.unwrap();
        assert_eq!(first.source_path.as_deref(), Some(Path::new("/tmp/1.jpeg")));

        let second = camera.get_photo(CaptureRequest::new()).await.unwrap();
        assert_eq!(second.source_path.as_deref(), Some(Path::new("/tmp/2.jpeg")));

        let err = camera.get_photo(CaptureRequest::new()).await.unwrap_err();
        assert!(matches!(err, GalleryError::CaptureCancelled));
        assert_eq!(camera.request_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_camera_permission_denied() {
        let camera = MockCamera::new()
            .with_capture(CapturedPhoto::from_source_path("/tmp/1.jpeg"))
            .with_permission_denied();

        let err = camera.get_photo(CaptureRequest::new()).await.unwrap_err();
        assert!(matches!(err, GalleryError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_mock_file_store_round_trip_and_logs() {
        let files = MockFileStore::new();

        files
            .write("a.jpeg", StorageDirectory::Data, b"abc")
            .await
            .unwrap();
        assert_eq!(
            files.read("a.jpeg", StorageDirectory::Data).await.unwrap(),
            b"abc"
        );
        assert_eq!(
            files.written_names(StorageDirectory::Data),
            vec!["a.jpeg".to_string()]
        );

        files.delete("a.jpeg", StorageDirectory::Data).await.unwrap();
        assert!(!files.contains("a.jpeg", StorageDirectory::Data));
        assert_eq!(
            files.deleted(),
            vec![("a.jpeg".to_string(), StorageDirectory::Data)]
        );
    }

    #[tokio::test]
    async fn test_mock_file_store_default_resolve() {
        let files = MockFileStore::new();
        let uri = files
            .resolve_uri("167.jpeg", StorageDirectory::Data)
            .await
            .unwrap();
        assert_eq!(uri, "file:///data/167.jpeg");
    }

    #[tokio::test]
    async fn test_mock_file_store_simulated_failures() {
        let files = MockFileStore::new().with_failing_writes();
        let err = files
            .write("a.jpeg", StorageDirectory::Data, b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Io(_)));

        let files = MockFileStore::new()
            .with_file("bad.jpeg", StorageDirectory::Data, b"x".to_vec())
            .with_read_error("bad.jpeg");
        let err = files
            .read("bad.jpeg", StorageDirectory::Data)
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Io(_)));
    }

    #[tokio::test]
    async fn test_mock_preference_store_set_log() {
        let prefs = MockPreferenceStore::new();
        assert_eq!(prefs.get("photos").await.unwrap(), None);

        prefs.set("photos", "[]").await.unwrap();
        assert_eq!(prefs.stored_value("photos").as_deref(), Some("[]"));
        assert_eq!(prefs.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_web_resources_fetch() {
        let web = MockWebResources::new().with_resource("blob:x", b"bytes".to_vec());
        assert_eq!(web.fetch("blob:x").await.unwrap(), b"bytes");

        let err = web.fetch("blob:missing").await.unwrap_err();
        assert!(matches!(err, GalleryError::Fetch { .. }));
    }
}
