//! Gallery Controller Module
//!
//! Provides a thread-safe controller for driving gallery operations from a
//! UI frontend. Operations run on a background runtime and report back
//! through a channel the frontend polls; nothing blocks the render thread.
//!
//! Operations do not exclude each other. A capture fired while a load is
//! still running behaves exactly like two overlapping calls on the store,
//! and the events arrive in whichever order the operations finish.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::runtime::Runtime;

use crate::core::error::{GalleryError, Result};
use crate::core::photo::Photo;
use crate::core::store::PhotoGalleryStore;
use crate::ui::events::{AppEvent, GalleryEvent, UiEvent};

/// How long `shutdown` waits for outstanding operations to finish
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

// =============================================================================
// Gallery Controller
// =============================================================================

/// Thread-safe gallery controller
///
/// The controller wraps a [`PhotoGalleryStore`] and provides a clean
/// interface for UI integration:
///
/// - Firing loads, captures, and deletions without blocking
/// - Selection handling for the delete-confirmation sheet
/// - Event emission for UI updates
pub struct GalleryController {
    /// The store all operations run against
    store: Arc<PhotoGalleryStore>,
    /// Runtime the operations are spawned onto
    runtime: Runtime,
    /// Operations currently running
    in_flight: Arc<AtomicUsize>,
    /// Event receiver for the frontend
    event_rx: Mutex<Receiver<UiEvent>>,
    /// Event sender handed to spawned operations
    event_tx: Sender<UiEvent>,
    /// Last operation error, cancellations excluded
    last_error: Arc<RwLock<Option<String>>>,
}

impl GalleryController {
    /// Create a controller around a store
    pub fn new(store: Arc<PhotoGalleryStore>) -> Result<Self> {
        let runtime = Runtime::new()?;
        let (event_tx, event_rx) = mpsc::channel();

        Ok(Self {
            store,
            runtime,
            in_flight: Arc::new(AtomicUsize::new(0)),
            event_rx: Mutex::new(event_rx),
            event_tx,
            last_error: Arc::new(RwLock::new(None)),
        })
    }

    /// The published gallery, newest first
    pub fn photos(&self) -> Vec<Photo> {
        self.store.photos()
    }

    /// The photo currently selected for deletion, if any
    pub fn pending_delete(&self) -> Option<Photo> {
        self.store.pending_delete()
    }

    /// Number of operations currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Whether any operation is still running
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Get last error
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().unwrap().clone()
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv_event(&self) -> Option<UiEvent> {
        match self.event_rx.lock().unwrap().try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Receive events with timeout
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<UiEvent> {
        self.event_rx.lock().unwrap().recv_timeout(timeout).ok()
    }

    /// Drain all pending events
    pub fn drain_events(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv_event() {
            events.push(event);
        }
        events
    }

    /// Restore the gallery from storage in the background
    pub fn load_saved(&self) {
        let store = Arc::clone(&self.store);
        let event_tx = self.event_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let last_error = Arc::clone(&self.last_error);

        in_flight.fetch_add(1, Ordering::SeqCst);
        let _ = event_tx.send(GalleryEvent::LoadStarted.into());

        self.runtime.spawn(async move {
            let start = Instant::now();
            match store.load_saved().await {
                Ok(photos) => {
                    let _ = event_tx.send(
                        GalleryEvent::LoadCompleted {
                            photos,
                            duration: start.elapsed(),
                        }
                        .into(),
                    );
                }
                Err(e) => {
                    warn!("Loading the gallery failed: {}", e);
                    *last_error.write().unwrap() = Some(e.to_string());
                    let _ = event_tx.send(
                        GalleryEvent::LoadFailed {
                            error: e.to_string(),
                        }
                        .into(),
                    );
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Capture a photo and add it to the gallery in the background
    pub fn take_photo(&self) {
        let store = Arc::clone(&self.store);
        let event_tx = self.event_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let last_error = Arc::clone(&self.last_error);

        in_flight.fetch_add(1, Ordering::SeqCst);
        let _ = event_tx.send(GalleryEvent::CaptureStarted.into());

        self.runtime.spawn(async move {
            match store.take_photo().await {
                Ok(photo) => {
                    let total = store.photos().len();
                    let _ = event_tx.send(GalleryEvent::CaptureCompleted { photo, total }.into());
                }
                Err(e) => {
                    let cancelled = matches!(e, GalleryError::CaptureCancelled);
                    if cancelled {
                        debug!("Capture dismissed by the user");
                    } else {
                        warn!("Capture failed: {}", e);
                        *last_error.write().unwrap() = Some(e.to_string());
                    }
                    let _ = event_tx.send(
                        GalleryEvent::CaptureFailed {
                            error: e.to_string(),
                            cancelled,
                        }
                        .into(),
                    );
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Delete a photo outright in the background
    pub fn delete_photo(&self, photo: Photo) {
        let store = Arc::clone(&self.store);
        let event_tx = self.event_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let last_error = Arc::clone(&self.last_error);

        in_flight.fetch_add(1, Ordering::SeqCst);

        self.runtime.spawn(async move {
            match store.delete_photo(&photo).await {
                Ok(()) => {
                    let remaining = store.photos().len();
                    let _ = event_tx.send(
                        GalleryEvent::DeleteCompleted {
                            filepath: photo.filepath,
                            remaining,
                        }
                        .into(),
                    );
                }
                Err(e) => {
                    warn!("Deleting {} failed: {}", photo.filepath, e);
                    *last_error.write().unwrap() = Some(e.to_string());
                    let _ = event_tx.send(
                        GalleryEvent::DeleteFailed {
                            filepath: photo.filepath,
                            error: e.to_string(),
                        }
                        .into(),
                    );
                }
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Select (or clear) the photo awaiting delete confirmation
    pub fn select_pending_delete(&self, photo: Option<Photo>) {
        self.store.set_pending_delete(photo.clone());
        let _ = self
            .event_tx
            .send(GalleryEvent::SelectionChanged { pending: photo }.into());
    }

    /// Dismiss the confirmation sheet without deleting
    pub fn cancel_pending_delete(&self) {
        self.select_pending_delete(None);
    }

    /// Confirm the pending deletion in the background
    ///
    /// The selection is cleared whichever way the confirmation goes, so the
    /// sheet closes even when the deletion itself fails.
    pub fn confirm_pending_delete(&self) {
        let store = Arc::clone(&self.store);
        let event_tx = self.event_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let last_error = Arc::clone(&self.last_error);

        in_flight.fetch_add(1, Ordering::SeqCst);

        self.runtime.spawn(async move {
            let pending = store.pending_delete();
            match store.confirm_pending_delete().await {
                Ok(Some(photo)) => {
                    let remaining = store.photos().len();
                    let _ = event_tx.send(
                        GalleryEvent::DeleteCompleted {
                            filepath: photo.filepath,
                            remaining,
                        }
                        .into(),
                    );
                }
                Ok(None) => {
                    debug!("Delete confirmed with nothing selected");
                }
                Err(e) => {
                    let filepath = pending.map(|p| p.filepath).unwrap_or_default();
                    warn!("Confirmed deletion of {} failed: {}", filepath, e);
                    *last_error.write().unwrap() = Some(e.to_string());
                    let _ = event_tx.send(GalleryEvent::DeleteFailed { filepath, error: e.to_string() }.into());
                }
            }
            let _ = event_tx.send(GalleryEvent::SelectionChanged { pending: None }.into());
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Wait until no operations are running, up to `timeout`
    ///
    /// Returns `true` once idle; `false` when the timeout elapsed first.
    /// Must not be called from within an async context.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }

    /// Shutdown the controller
    pub fn shutdown(&self) {
        if !self.wait_idle(SHUTDOWN_GRACE) {
            warn!("Shutting down with operations still in flight");
        }
        let _ = self.event_tx.send(UiEvent::App(AppEvent::ShuttingDown));
    }
}

impl Drop for GalleryController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::journeys::build_environment;
    use crate::testkit::scenarios::{ScenarioFixtures, ScenarioLibrary};
    use crate::testkit::mocks::MockFileStore;

    const EVENT_WAIT: Duration = Duration::from_secs(2);

    fn controller_from(fixtures: &ScenarioFixtures) -> (GalleryController, Arc<MockFileStore>) {
        let env = build_environment(fixtures);
        let files = env.files.clone();
        let controller = GalleryController::new(Arc::new(env.store)).unwrap();
        (controller, files)
    }

    fn next_gallery_event(controller: &GalleryController) -> GalleryEvent {
        loop {
            match controller.recv_event_timeout(EVENT_WAIT) {
                Some(UiEvent::Gallery(event)) => return event,
                Some(UiEvent::App(_)) => continue,
                None => panic!("no event within {:?}", EVENT_WAIT),
            }
        }
    }

    #[test]
    fn test_controller_creation() {
        let (controller, _) = controller_from(&ScenarioFixtures::direct());
        assert_eq!(controller.in_flight(), 0);
        assert!(!controller.is_busy());
        assert!(controller.photos().is_empty());
        assert!(controller.try_recv_event().is_none());
    }

    #[test]
    fn test_load_emits_started_then_completed() {
        let scenario = ScenarioLibrary::seeded_direct();
        let (controller, _) = controller_from(&scenario.fixtures);

        controller.load_saved();

        assert!(matches!(
            next_gallery_event(&controller),
            GalleryEvent::LoadStarted
        ));
        match next_gallery_event(&controller) {
            GalleryEvent::LoadCompleted { photos, .. } => assert_eq!(photos.len(), 3),
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(controller.wait_idle(EVENT_WAIT));
        assert_eq!(controller.photos().len(), 3);
    }

    #[test]
    fn test_capture_completes_and_publishes() {
        let scenario = ScenarioLibrary::capture_direct();
        let (controller, files) = controller_from(&scenario.fixtures);

        controller.take_photo();

        assert!(matches!(
            next_gallery_event(&controller),
            GalleryEvent::CaptureStarted
        ));
        match next_gallery_event(&controller) {
            GalleryEvent::CaptureCompleted { total, .. } => assert_eq!(total, 1),
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(controller.wait_idle(EVENT_WAIT));
        assert_eq!(controller.photos().len(), 1);
        assert_eq!(
            files
                .written_names(crate::platform::StorageDirectory::Data)
                .len(),
            1
        );
    }

    #[test]
    fn test_cancelled_capture_is_not_an_error() {
        let (controller, _) = controller_from(&ScenarioFixtures::direct());

        controller.take_photo();

        assert!(matches!(
            next_gallery_event(&controller),
            GalleryEvent::CaptureStarted
        ));
        match next_gallery_event(&controller) {
            GalleryEvent::CaptureFailed { cancelled, .. } => assert!(cancelled),
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(controller.wait_idle(EVENT_WAIT));
        assert!(controller.last_error().is_none());
        assert!(controller.photos().is_empty());
    }

    #[test]
    fn test_selection_round_trip() {
        let scenario = ScenarioLibrary::selection_held();
        let (controller, _) = controller_from(&scenario.fixtures);

        controller.load_saved();
        assert!(controller.wait_idle(EVENT_WAIT));
        controller.drain_events();

        let photo = controller.photos().remove(0);
        controller.select_pending_delete(Some(photo.clone()));

        match next_gallery_event(&controller) {
            GalleryEvent::SelectionChanged { pending } => {
                assert_eq!(pending.map(|p| p.filepath), Some(photo.filepath.clone()));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            controller.pending_delete().map(|p| p.filepath),
            Some(photo.filepath)
        );

        controller.cancel_pending_delete();
        match next_gallery_event(&controller) {
            GalleryEvent::SelectionChanged { pending } => assert!(pending.is_none()),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(controller.pending_delete().is_none());
    }

    #[test]
    fn test_confirm_deletes_and_closes_sheet() {
        let scenario = ScenarioLibrary::delete_journey();
        let (controller, files) = controller_from(&scenario.fixtures);

        controller.load_saved();
        assert!(controller.wait_idle(EVENT_WAIT));
        controller.drain_events();

        let target = controller.photos().pop().unwrap();
        controller.select_pending_delete(Some(target.clone()));
        controller.drain_events();

        controller.confirm_pending_delete();

        match next_gallery_event(&controller) {
            GalleryEvent::DeleteCompleted {
                filepath,
                remaining,
            } => {
                assert_eq!(filepath, target.filepath);
                assert_eq!(remaining, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match next_gallery_event(&controller) {
            GalleryEvent::SelectionChanged { pending } => assert!(pending.is_none()),
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(controller.wait_idle(EVENT_WAIT));
        assert_eq!(controller.photos().len(), 1);
        assert_eq!(files.deleted().len(), 1);
        assert!(controller.pending_delete().is_none());
    }

    #[test]
    fn test_failed_delete_still_closes_sheet() {
        let scenario = ScenarioLibrary::delete_missing_file();
        let (controller, _) = controller_from(&scenario.fixtures);

        controller.load_saved();
        assert!(controller.wait_idle(EVENT_WAIT));
        controller.drain_events();

        let target = controller.photos().remove(0);
        controller.select_pending_delete(Some(target.clone()));
        controller.drain_events();

        controller.confirm_pending_delete();

        match next_gallery_event(&controller) {
            GalleryEvent::DeleteFailed { filepath, .. } => {
                assert_eq!(filepath, target.filepath);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match next_gallery_event(&controller) {
            GalleryEvent::SelectionChanged { pending } => assert!(pending.is_none()),
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(controller.wait_idle(EVENT_WAIT));
        assert!(controller.last_error().is_some());
        assert!(controller.pending_delete().is_none());
    }
}
