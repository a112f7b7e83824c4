//! The photo gallery store
//!
//! Owns the authoritative in-memory photo list and coordinates the platform
//! collaborators through the full gallery workflow:
//! - Loading the persisted manifest at startup
//! - Capturing a photo, saving it to Data storage, prepending it
//! - Deleting a photo from both the manifest and the filesystem
//! - Holding the transient pending-delete selection for the UI
//!
//! Every mutation snapshots the list at entry, computes the new list, and
//! overwrites at the end. No lock is held across an await, so overlapping
//! operations interleave freely and the last publication wins.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::photo::{decode_manifest, encode_manifest, Photo};
use crate::platform::profile::CapabilityProfile;
use crate::platform::traits::{
    Camera, CameraResultKind, CameraSource, CaptureRequest, FileStore, PreferenceStore,
    StorageDirectory,
};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{Arc, RwLock};

/// Store-level settings, usually derived from [`Config`]
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Preference key the manifest is stored under
    pub manifest_key: String,
    /// Extension appended to timestamp-based file names
    pub file_extension: String,
    /// JPEG quality requested from the camera
    pub quality: u8,
    /// Where captures come from
    pub source: CameraSource,
}

impl StoreSettings {
    /// Extract the store settings from the application config
    pub fn from_config(config: &Config) -> Self {
        Self {
            manifest_key: config.storage.manifest_key.clone(),
            file_extension: config.capture.file_extension.clone(),
            quality: config.capture.quality,
            source: config.capture.source,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            manifest_key: "photos".to_string(),
            file_extension: ".jpeg".to_string(),
            quality: 100,
            source: CameraSource::Camera,
        }
    }
}

/// Authoritative gallery state plus the operations that mutate it
///
/// The store never branches on platform: everything platform-specific goes
/// through the injected [`CapabilityProfile`].
pub struct PhotoGalleryStore {
    camera: Arc<dyn Camera>,
    files: Arc<dyn FileStore>,
    prefs: Arc<dyn PreferenceStore>,
    profile: Arc<dyn CapabilityProfile>,
    settings: StoreSettings,

    /// Published photo list, newest first
    photos: RwLock<Vec<Photo>>,

    /// Photo selected for deletion, awaiting confirmation
    pending_delete: RwLock<Option<Photo>>,
}

impl PhotoGalleryStore {
    /// Create a store wired to its collaborators
    ///
    /// Construction is synchronous and touches nothing; call
    /// [`load_saved`](Self::load_saved) to restore the persisted gallery.
    pub fn new(
        camera: Arc<dyn Camera>,
        files: Arc<dyn FileStore>,
        prefs: Arc<dyn PreferenceStore>,
        profile: Arc<dyn CapabilityProfile>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            camera,
            files,
            prefs,
            profile,
            settings,
            photos: RwLock::new(Vec::new()),
            pending_delete: RwLock::new(None),
        }
    }

    /// Current photo list, newest first
    pub fn photos(&self) -> Vec<Photo> {
        self.photos.read().unwrap().clone()
    }

    /// The photo currently selected for deletion, if any
    pub fn pending_delete(&self) -> Option<Photo> {
        self.pending_delete.read().unwrap().clone()
    }

    /// Select (or clear) the photo awaiting delete confirmation
    ///
    /// Gates nothing but the UI affordance; the actual deletion happens in
    /// [`confirm_pending_delete`](Self::confirm_pending_delete) or
    /// [`delete_photo`](Self::delete_photo).
    pub fn set_pending_delete(&self, photo: Option<Photo>) {
        *self.pending_delete.write().unwrap() = photo;
    }

    /// Load the persisted gallery and publish it
    ///
    /// An absent or empty manifest yields an empty gallery. Photos are run
    /// through the profile's materialization before publication, so the
    /// published entries are always renderable.
    pub async fn load_saved(&self) -> Result<Vec<Photo>> {
        debug!(
            "Loading manifest (key: {}, profile: {})",
            self.settings.manifest_key,
            self.profile.name()
        );

        let raw = self.prefs.get(&self.settings.manifest_key).await?;
        let mut photos = match raw.as_deref() {
            None => Vec::new(),
            Some(raw) if raw.is_empty() => Vec::new(),
            Some(raw) => decode_manifest(raw)?,
        };

        self.profile.materialize(&mut photos).await?;

        info!("Loaded {} saved photo(s)", photos.len());
        *self.photos.write().unwrap() = photos.clone();
        Ok(photos)
    }

    /// Capture a photo, save it to Data storage, and prepend it
    ///
    /// The file name is the capture-time Unix-epoch milliseconds plus the
    /// configured extension. Collisions between same-millisecond captures
    /// are not guarded; the later write replaces the earlier file.
    ///
    /// Failures before publication leave the gallery untouched. A
    /// persistence failure *after* publication propagates and leaves the
    /// stored manifest stale until the next successful mutation.
    pub async fn take_photo(&self) -> Result<Photo> {
        let snapshot = self.photos.read().unwrap().clone();

        let request = CaptureRequest {
            result_kind: CameraResultKind::Uri,
            source: self.settings.source,
            quality: self.settings.quality,
        };
        let captured = self.camera.get_photo(request).await?;

        let file_name = format!(
            "{}{}",
            Utc::now().timestamp_millis(),
            self.settings.file_extension
        );
        debug!("Saving capture as {}", file_name);

        let bytes = self.profile.capture_contents(&captured).await?;
        self.files
            .write(&file_name, StorageDirectory::Data, &bytes)
            .await?;

        let photo = self.profile.renderable_reference(&captured, &file_name).await?;

        let mut photos = Vec::with_capacity(snapshot.len() + 1);
        photos.push(photo.clone());
        photos.extend(snapshot);

        *self.photos.write().unwrap() = photos.clone();

        if let Err(e) = self.persist(&photos).await {
            warn!(
                "Photo list published but persisting it failed; stored manifest is stale until the next successful mutation: {}",
                e
            );
            return Err(e);
        }

        info!("Captured {} ({} bytes)", file_name, bytes.len());
        Ok(photo)
    }

    /// Delete a photo: every list entry with the same filepath, the stored
    /// manifest entry, and the file itself
    ///
    /// The manifest is rewritten *before* the filesystem delete, so a failed
    /// file removal can leave an orphaned file but never a dangling manifest
    /// entry. The new list is only published once the file delete succeeds.
    pub async fn delete_photo(&self, photo: &Photo) -> Result<()> {
        let snapshot = self.photos.read().unwrap().clone();
        let remaining: Vec<Photo> = snapshot
            .into_iter()
            .filter(|p| p.filepath != photo.filepath)
            .collect();

        self.persist(&remaining).await?;

        let file_name = photo.file_name();
        debug!("Deleting {} from Data storage", file_name);
        self.files.delete(file_name, StorageDirectory::Data).await?;

        *self.photos.write().unwrap() = remaining;
        info!("Deleted photo {}", photo.filepath);
        Ok(())
    }

    /// Confirm the pending-delete selection
    ///
    /// Clears the selection first (the sheet is dismissed regardless of the
    /// outcome), then runs the deletion. Returns the photo that was deleted,
    /// or `None` if nothing was selected.
    pub async fn confirm_pending_delete(&self) -> Result<Option<Photo>> {
        let photo = self.pending_delete.write().unwrap().take();
        match photo {
            Some(photo) => {
                self.delete_photo(&photo).await?;
                Ok(Some(photo))
            }
            None => Ok(None),
        }
    }

    async fn persist(&self, photos: &[Photo]) -> Result<()> {
        let manifest = encode_manifest(photos)?;
        self.prefs.set(&self.settings.manifest_key, &manifest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GalleryError;
    use crate::platform::profile::{DirectAccessProfile, MaterializingProfile};
    use crate::platform::traits::CapturedPhoto;
    use crate::testkit::mocks::{
        MockCamera, MockFileStore, MockPreferenceStore, MockWebResources,
    };

    struct DirectFixture {
        camera: Arc<MockCamera>,
        files: Arc<MockFileStore>,
        prefs: Arc<MockPreferenceStore>,
        store: PhotoGalleryStore,
    }

    fn direct_store(camera: MockCamera, files: MockFileStore, prefs: MockPreferenceStore) -> DirectFixture {
        let camera = Arc::new(camera);
        let files = Arc::new(files);
        let prefs = Arc::new(prefs);
        let profile = Arc::new(DirectAccessProfile::new(files.clone()));
        let store = PhotoGalleryStore::new(
            camera.clone(),
            files.clone(),
            prefs.clone(),
            profile,
            StoreSettings::default(),
        );
        DirectFixture {
            camera,
            files,
            prefs,
            store,
        }
    }

    fn web_store(
        files: MockFileStore,
        prefs: MockPreferenceStore,
        web: MockWebResources,
    ) -> (Arc<MockFileStore>, Arc<MockPreferenceStore>, PhotoGalleryStore) {
        let camera = Arc::new(MockCamera::new());
        let files = Arc::new(files);
        let prefs = Arc::new(prefs);
        let profile = Arc::new(MaterializingProfile::new(files.clone(), Arc::new(web)));
        let store = PhotoGalleryStore::new(
            camera,
            files.clone(),
            prefs.clone(),
            profile,
            StoreSettings::default(),
        );
        (files, prefs, store)
    }

    #[tokio::test]
    async fn test_load_with_empty_storage_yields_empty_gallery() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new(),
        );

        let photos = fixture.store.load_saved().await.unwrap();
        assert!(photos.is_empty());
        assert!(fixture.store.photos().is_empty());
    }

    #[tokio::test]
    async fn test_load_treats_empty_string_as_empty_gallery() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new().with_value("photos", ""),
        );

        let photos = fixture.store.load_saved().await.unwrap();
        assert!(photos.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_manifest() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new().with_value("photos", "not json"),
        );

        let err = fixture.store.load_saved().await.unwrap_err();
        assert!(matches!(err, GalleryError::Manifest(_)));
        assert!(fixture.store.photos().is_empty());
    }

    #[tokio::test]
    async fn test_load_direct_profile_publishes_entries_as_stored() {
        let manifest = r#"[{"filepath":"file:///data/2.jpeg","displayPath":"asset://localhost/data/2.jpeg"},{"filepath":"file:///data/1.jpeg"}]"#;
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new().with_value("photos", manifest),
        );

        let photos = fixture.store.load_saved().await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].filepath, "file:///data/2.jpeg");
        assert_eq!(
            photos[0].display_path.as_deref(),
            Some("asset://localhost/data/2.jpeg")
        );
        assert_eq!(photos[0].inline_data, None);
        assert_eq!(photos[1].inline_data, None);
    }

    #[tokio::test]
    async fn test_load_materializing_profile_inlines_file_bytes() {
        let (_files, _prefs, store) = web_store(
            MockFileStore::new().with_file("a.jpeg", StorageDirectory::Data, b"foo".to_vec()),
            MockPreferenceStore::new().with_value("photos", r#"[{"filepath":"a.jpeg"}]"#),
            MockWebResources::new(),
        );

        let photos = store.load_saved().await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(
            photos[0].inline_data.as_deref(),
            Some("data:image/jpeg;base64,Zm9v")
        );
    }

    #[tokio::test]
    async fn test_take_photo_prepends_newest_first() {
        let fixture = direct_store(
            MockCamera::new().with_capture(CapturedPhoto::from_source_path("/tmp/cap.jpeg")),
            MockFileStore::new().with_external_file("/tmp/cap.jpeg", b"jpeg".to_vec()),
            MockPreferenceStore::new()
                .with_value("photos", r#"[{"filepath":"file:///data/old.jpeg"}]"#),
        );
        fixture.store.load_saved().await.unwrap();

        let before = Utc::now().timestamp_millis();
        let photo = fixture.store.take_photo().await.unwrap();
        let after = Utc::now().timestamp_millis();

        let photos = fixture.store.photos();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0], photo);
        assert_eq!(photos[1].filepath, "file:///data/old.jpeg");

        // File name is capture-time millis + extension
        let written = fixture.files.written_names(StorageDirectory::Data);
        assert_eq!(written.len(), 1);
        let stem = written[0].strip_suffix(".jpeg").unwrap();
        let millis: i64 = stem.parse().unwrap();
        assert!(millis >= before && millis <= after);

        // Direct profile: identity is the resolved URI, rendered via the
        // converted asset URL
        assert_eq!(photo.filepath, format!("file:///data/{}", written[0]));
        assert_eq!(
            photo.display_path.as_deref().unwrap(),
            format!("asset://localhost/data/{}", written[0])
        );
    }

    #[tokio::test]
    async fn test_take_photo_persists_manifest_without_inline_data() {
        let fixture = direct_store(
            MockCamera::new().with_capture(CapturedPhoto::from_source_path("/tmp/cap.jpeg")),
            MockFileStore::new().with_external_file("/tmp/cap.jpeg", b"jpeg".to_vec()),
            MockPreferenceStore::new(),
        );

        fixture.store.take_photo().await.unwrap();

        let stored = fixture.prefs.stored_value("photos").unwrap();
        assert!(stored.contains("\"filepath\""));
        assert!(stored.contains("\"displayPath\""));
        assert!(!stored.contains("inlineData"));
    }

    #[tokio::test]
    async fn test_take_photo_passes_configured_quality_and_source() {
        let camera = Arc::new(
            MockCamera::new().with_capture(CapturedPhoto::from_source_path("/tmp/cap.jpeg")),
        );
        let files = Arc::new(
            MockFileStore::new().with_external_file("/tmp/cap.jpeg", b"jpeg".to_vec()),
        );
        let profile = Arc::new(DirectAccessProfile::new(files.clone()));
        let settings = StoreSettings {
            quality: 80,
            source: CameraSource::Photos,
            ..Default::default()
        };
        let store = PhotoGalleryStore::new(
            camera.clone(),
            files,
            Arc::new(MockPreferenceStore::new()),
            profile,
            settings,
        );

        store.take_photo().await.unwrap();

        let request = camera.last_request().unwrap();
        assert_eq!(request.quality, 80);
        assert_eq!(request.source, CameraSource::Photos);
        assert_eq!(request.result_kind, CameraResultKind::Uri);
    }

    #[tokio::test]
    async fn test_take_photo_cancel_leaves_gallery_untouched() {
        // Empty capture queue behaves like the user backing out
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new(),
        );

        let err = fixture.store.take_photo().await.unwrap_err();
        assert!(matches!(err, GalleryError::CaptureCancelled));
        assert!(fixture.store.photos().is_empty());
        assert_eq!(fixture.prefs.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_take_photo_permission_denied_propagates() {
        let fixture = direct_store(
            MockCamera::new().with_permission_denied(),
            MockFileStore::new(),
            MockPreferenceStore::new(),
        );

        let err = fixture.store.take_photo().await.unwrap_err();
        assert!(matches!(err, GalleryError::PermissionDenied));
        assert!(fixture.store.photos().is_empty());
    }

    #[tokio::test]
    async fn test_take_photo_storage_failure_leaves_published_but_stale() {
        let fixture = direct_store(
            MockCamera::new().with_capture(CapturedPhoto::from_source_path("/tmp/cap.jpeg")),
            MockFileStore::new().with_external_file("/tmp/cap.jpeg", b"jpeg".to_vec()),
            MockPreferenceStore::new().with_failing_set(),
        );

        let err = fixture.store.take_photo().await.unwrap_err();
        assert!(matches!(err, GalleryError::Storage(_)));

        // Published in memory, never persisted: divergence until the next
        // successful mutation
        assert_eq!(fixture.store.photos().len(), 1);
        assert_eq!(fixture.prefs.stored_value("photos"), None);
    }

    #[tokio::test]
    async fn test_delete_removes_every_matching_filepath() {
        let manifest = r#"[{"filepath":"file:///data/dup.jpeg"},{"filepath":"file:///data/keep.jpeg"},{"filepath":"file:///data/dup.jpeg"}]"#;
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new().with_file("dup.jpeg", StorageDirectory::Data, b"x".to_vec()),
            MockPreferenceStore::new().with_value("photos", manifest),
        );
        fixture.store.load_saved().await.unwrap();

        let target = Photo::new("file:///data/dup.jpeg");
        fixture.store.delete_photo(&target).await.unwrap();

        let photos = fixture.store.photos();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].filepath, "file:///data/keep.jpeg");
    }

    #[tokio::test]
    async fn test_delete_issues_bare_name_filesystem_delete() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new().with_file("167.jpeg", StorageDirectory::Data, b"x".to_vec()),
            MockPreferenceStore::new()
                .with_value("photos", r#"[{"filepath":"file:///data/167.jpeg"}]"#),
        );
        fixture.store.load_saved().await.unwrap();

        let target = Photo::new("file:///data/167.jpeg");
        fixture.store.delete_photo(&target).await.unwrap();

        assert_eq!(
            fixture.files.deleted(),
            vec![("167.jpeg".to_string(), StorageDirectory::Data)]
        );
        assert_eq!(
            fixture.prefs.stored_value("photos").as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_delete_persists_before_filesystem_delete() {
        // File delete fails, but the manifest was already rewritten and the
        // in-memory list keeps the photo (publish is skipped)
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new().with_failing_delete(),
            MockPreferenceStore::new()
                .with_value("photos", r#"[{"filepath":"file:///data/167.jpeg"}]"#),
        );
        fixture.store.load_saved().await.unwrap();

        let target = Photo::new("file:///data/167.jpeg");
        let err = fixture.store.delete_photo(&target).await.unwrap_err();
        assert!(matches!(err, GalleryError::Io(_)));

        assert_eq!(
            fixture.prefs.stored_value("photos").as_deref(),
            Some("[]")
        );
        assert_eq!(fixture.store.photos().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_delete_selection_round_trip() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new(),
        );

        assert_eq!(fixture.store.pending_delete(), None);

        let photo = Photo::new("file:///data/167.jpeg");
        fixture.store.set_pending_delete(Some(photo.clone()));
        assert_eq!(fixture.store.pending_delete(), Some(photo));

        fixture.store.set_pending_delete(None);
        assert_eq!(fixture.store.pending_delete(), None);
    }

    #[tokio::test]
    async fn test_confirm_pending_delete_runs_deletion_and_clears() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new().with_file("167.jpeg", StorageDirectory::Data, b"x".to_vec()),
            MockPreferenceStore::new()
                .with_value("photos", r#"[{"filepath":"file:///data/167.jpeg"}]"#),
        );
        fixture.store.load_saved().await.unwrap();

        let photo = Photo::new("file:///data/167.jpeg");
        fixture.store.set_pending_delete(Some(photo.clone()));

        let deleted = fixture.store.confirm_pending_delete().await.unwrap();
        assert_eq!(deleted, Some(photo));
        assert_eq!(fixture.store.pending_delete(), None);
        assert!(fixture.store.photos().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_without_selection_is_a_no_op() {
        let fixture = direct_store(
            MockCamera::new(),
            MockFileStore::new(),
            MockPreferenceStore::new(),
        );

        let deleted = fixture.store.confirm_pending_delete().await.unwrap();
        assert_eq!(deleted, None);
        assert_eq!(fixture.prefs.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_settings_from_config() {
        let mut config = Config::default();
        config.storage.manifest_key = "album".to_string();
        config.capture.quality = 42;
        config.capture.file_extension = ".jpg".to_string();

        let settings = StoreSettings::from_config(&config);
        assert_eq!(settings.manifest_key, "album");
        assert_eq!(settings.quality, 42);
        assert_eq!(settings.file_extension, ".jpg");
        assert_eq!(settings.source, CameraSource::Camera);
    }
}
