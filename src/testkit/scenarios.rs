//! Predefined gallery scenarios for comprehensive testing
//!
//! This module provides ready-to-use scenarios that cover the gallery's
//! user journeys, edge cases, and failure conditions. Each scenario bundles
//! the fixtures to build a store from, a script of user actions, and the
//! outcome the journey should end in.

use super::generator::GalleryDataGenerator;
use crate::core::photo::{encode_manifest, Photo};
use crate::core::store::StoreSettings;

/// Which capability profile the scenario's store runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Stored photo URIs can be handed straight to a renderer
    Direct,
    /// Stored photos must be re-read and inlined before rendering
    Materializing,
}

/// A capture staged for the scenario's camera to hand out
///
/// Under [`ProfileKind::Direct`] the reference is a filesystem path and the
/// bytes are staged as an external file; under [`ProfileKind::Materializing`]
/// it is a web URL and the bytes are staged as a fetchable resource.
#[derive(Debug, Clone)]
pub struct StagedCapture {
    /// Path or URL the camera reports for the capture
    pub reference: String,
    /// Raw photo content behind that reference
    pub bytes: Vec<u8>,
}

/// Everything needed to construct a store for one scenario
#[derive(Debug, Clone)]
pub struct ScenarioFixtures {
    /// Capability profile to wire the store with
    pub profile: ProfileKind,
    /// Manifest JSON pre-seeded under the store's manifest key
    pub stored_manifest: Option<String>,
    /// Files pre-seeded in the app data directory
    pub stored_files: Vec<(String, Vec<u8>)>,
    /// Captures queued for the camera, handed out in order
    pub staged_captures: Vec<StagedCapture>,
    /// Camera denies permission instead of capturing
    pub deny_permission: bool,
    /// Preference writes fail, so the manifest can never be persisted
    pub fail_persist: bool,
    /// Stored-file deletes fail after being recorded
    pub fail_delete: bool,
    /// Store settings, defaulting to the out-of-the-box config
    pub settings: StoreSettings,
}

impl ScenarioFixtures {
    /// Fixtures for a store with direct file access
    pub fn direct() -> Self {
        Self {
            profile: ProfileKind::Direct,
            stored_manifest: None,
            stored_files: Vec::new(),
            staged_captures: Vec::new(),
            deny_permission: false,
            fail_persist: false,
            fail_delete: false,
            settings: StoreSettings::default(),
        }
    }

    /// Fixtures for a store that must materialize photos to render them
    pub fn materializing() -> Self {
        Self {
            profile: ProfileKind::Materializing,
            ..Self::direct()
        }
    }
}

/// One user action in a scenario script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyStep {
    /// Restore the gallery from storage, as the app does on launch
    LoadSaved,
    /// Capture a photo and add it to the gallery
    TakePhoto,
    /// Delete the photo with this filepath outright
    DeletePhoto { filepath: String },
    /// Mark the photo with this filepath for deletion (open the sheet)
    SelectPendingDelete { filepath: String },
    /// Confirm the pending deletion (destructive sheet button)
    ConfirmPendingDelete,
    /// Dismiss the sheet without deleting
    CancelPendingDelete,
}

/// The state a journey should end in
#[derive(Debug, Clone, Default)]
pub struct ExpectedOutcome {
    /// Photos in the published gallery after the script runs
    pub gallery_len: usize,
    /// Entries in the persisted manifest, when a write is expected
    pub persisted_len: Option<usize>,
    /// Manifest writes that should have reached storage
    pub persist_calls: usize,
    /// Stored-file delete calls that should have been issued
    pub delete_calls: usize,
    /// Whether loaded photos should carry inline render data
    pub materialized: bool,
    /// Filepath expected to still be pending deletion at the end
    pub pending_selection: Option<String>,
    /// Whether every step should complete without error
    pub should_succeed: bool,
    /// Fragment of the error the failing step should report
    pub expected_error: Option<String>,
}

/// A complete gallery scenario: fixtures, script, and expected outcome
#[derive(Debug, Clone)]
pub struct GalleryScenario {
    /// Scenario name for identification
    pub name: String,
    /// Description of what this scenario exercises
    pub description: String,
    /// Fixtures the store is built from
    pub fixtures: ScenarioFixtures,
    /// User actions to run, in order
    pub script: Vec<JourneyStep>,
    /// Expected state after the script runs
    pub expected: ExpectedOutcome,
    /// Tags for filtering scenarios
    pub tags: Vec<String>,
}

impl GalleryScenario {
    /// Create a new scenario
    pub fn new(
        name: &str,
        description: &str,
        fixtures: ScenarioFixtures,
        script: Vec<JourneyStep>,
        expected: ExpectedOutcome,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            fixtures,
            script,
            expected,
            tags: Vec::new(),
        }
    }

    /// Add tags to the scenario
    pub fn with_tags(mut self, tags: Vec<&str>) -> Self {
        self.tags = tags.into_iter().map(String::from).collect();
        self
    }
}

/// Collection of all predefined gallery scenarios
pub struct ScenarioLibrary;

impl ScenarioLibrary {
    // =========================================================================
    // LOAD SCENARIOS
    // =========================================================================

    /// Scenario: First launch, nothing stored yet
    pub fn empty_gallery() -> GalleryScenario {
        GalleryScenario::new(
            "empty_gallery",
            "First launch with no stored manifest restores an empty gallery",
            ScenarioFixtures::direct(),
            vec![JourneyStep::LoadSaved],
            ExpectedOutcome {
                gallery_len: 0,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["load", "empty", "basic"])
    }

    /// Scenario: Relaunch with three photos on a direct-access store
    pub fn seeded_direct() -> GalleryScenario {
        GalleryScenario::new(
            "seeded_direct",
            "Relaunch restores stored entries as-is when files render directly",
            Self::seeded_direct_fixtures(3),
            vec![JourneyStep::LoadSaved],
            ExpectedOutcome {
                gallery_len: 3,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["load", "direct", "basic"])
    }

    /// Scenario: Relaunch on a store that must inline photo data
    pub fn seeded_web() -> GalleryScenario {
        GalleryScenario::new(
            "seeded_web",
            "Relaunch re-reads stored files and inlines them for rendering",
            Self::seeded_web_fixtures(2),
            vec![JourneyStep::LoadSaved],
            ExpectedOutcome {
                gallery_len: 2,
                materialized: true,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["load", "web", "basic"])
    }

    // =========================================================================
    // CAPTURE SCENARIOS
    // =========================================================================

    /// Scenario: Capture a photo with direct file access
    pub fn capture_direct() -> GalleryScenario {
        let mut fixtures = ScenarioFixtures::direct();
        fixtures.staged_captures.push(Self::staged_direct_capture(9));

        GalleryScenario::new(
            "capture_direct",
            "A capture is saved, prepended to the gallery, and persisted",
            fixtures,
            vec![JourneyStep::LoadSaved, JourneyStep::TakePhoto],
            ExpectedOutcome {
                gallery_len: 1,
                persisted_len: Some(1),
                persist_calls: 1,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["capture", "direct", "basic"])
    }

    /// Scenario: Capture a photo when content arrives over a web URL
    pub fn capture_web() -> GalleryScenario {
        let mut fixtures = ScenarioFixtures::materializing();
        fixtures.staged_captures.push(Self::staged_web_capture(9));

        GalleryScenario::new(
            "capture_web",
            "A web capture is fetched, saved under a bare name, and persisted",
            fixtures,
            vec![JourneyStep::LoadSaved, JourneyStep::TakePhoto],
            ExpectedOutcome {
                gallery_len: 1,
                persisted_len: Some(1),
                persist_calls: 1,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["capture", "web", "basic"])
    }

    /// Scenario: User backs out of the camera
    pub fn capture_cancelled() -> GalleryScenario {
        GalleryScenario::new(
            "capture_cancelled",
            "Backing out of the camera leaves the gallery and manifest untouched",
            ScenarioFixtures::direct(),
            vec![JourneyStep::TakePhoto],
            ExpectedOutcome {
                gallery_len: 0,
                persist_calls: 0,
                should_succeed: false,
                expected_error: Some("CaptureCancelled".to_string()),
                ..Default::default()
            },
        )
        .with_tags(vec!["capture", "error", "edge-case"])
    }

    /// Scenario: Camera permission denied
    pub fn permission_denied() -> GalleryScenario {
        let mut fixtures = ScenarioFixtures::direct();
        fixtures.deny_permission = true;

        GalleryScenario::new(
            "permission_denied",
            "A denied camera permission surfaces as an error without side effects",
            fixtures,
            vec![JourneyStep::TakePhoto],
            ExpectedOutcome {
                gallery_len: 0,
                persist_calls: 0,
                should_succeed: false,
                expected_error: Some("PermissionDenied".to_string()),
                ..Default::default()
            },
        )
        .with_tags(vec!["capture", "error", "edge-case"])
    }

    /// Scenario: Manifest write fails after the gallery was already updated
    pub fn storage_failure_divergence() -> GalleryScenario {
        let mut fixtures = ScenarioFixtures::direct();
        fixtures.staged_captures.push(Self::staged_direct_capture(3));
        fixtures.fail_persist = true;

        GalleryScenario::new(
            "storage_failure_divergence",
            "When persisting fails the captured photo stays published in memory",
            fixtures,
            vec![JourneyStep::TakePhoto],
            ExpectedOutcome {
                // The in-memory gallery diverges from the (unwritten) manifest
                gallery_len: 1,
                persist_calls: 0,
                should_succeed: false,
                expected_error: Some("Storage".to_string()),
                ..Default::default()
            },
        )
        .with_tags(vec!["capture", "error", "divergence"])
    }

    // =========================================================================
    // DELETE AND SHEET SCENARIOS
    // =========================================================================

    /// Scenario: Full delete journey through the confirmation sheet
    pub fn delete_journey() -> GalleryScenario {
        GalleryScenario::new(
            "delete_journey",
            "Select a photo, confirm the sheet, and see it removed everywhere",
            Self::seeded_direct_fixtures(2),
            vec![
                JourneyStep::LoadSaved,
                JourneyStep::SelectPendingDelete {
                    filepath: GalleryDataGenerator::direct_photo(0).filepath,
                },
                JourneyStep::ConfirmPendingDelete,
            ],
            ExpectedOutcome {
                gallery_len: 1,
                persisted_len: Some(1),
                persist_calls: 1,
                delete_calls: 1,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["delete", "sheet", "basic"])
    }

    /// Scenario: Sheet dismissed without deleting
    pub fn sheet_dismissed() -> GalleryScenario {
        GalleryScenario::new(
            "sheet_dismissed",
            "Dismissing the sheet clears the selection and deletes nothing",
            Self::seeded_direct_fixtures(1),
            vec![
                JourneyStep::LoadSaved,
                JourneyStep::SelectPendingDelete {
                    filepath: GalleryDataGenerator::direct_photo(0).filepath,
                },
                JourneyStep::CancelPendingDelete,
            ],
            ExpectedOutcome {
                gallery_len: 1,
                delete_calls: 0,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["delete", "sheet", "basic"])
    }

    /// Scenario: Selection survives until the user decides
    pub fn selection_held() -> GalleryScenario {
        let filepath = GalleryDataGenerator::direct_photo(0).filepath;

        GalleryScenario::new(
            "selection_held",
            "A selected photo stays pending while the sheet is open",
            Self::seeded_direct_fixtures(1),
            vec![
                JourneyStep::LoadSaved,
                JourneyStep::SelectPendingDelete {
                    filepath: filepath.clone(),
                },
            ],
            ExpectedOutcome {
                gallery_len: 1,
                pending_selection: Some(filepath),
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["sheet", "edge-case"])
    }

    /// Scenario: Deleting a photo whose stored file has gone missing
    pub fn delete_missing_file() -> GalleryScenario {
        let mut fixtures = Self::seeded_direct_fixtures(1);
        // Manifest entry survives but the file behind it is gone
        fixtures.stored_files.clear();

        GalleryScenario::new(
            "delete_missing_file",
            "Deleting an entry with a missing file persists first, then errors",
            fixtures,
            vec![
                JourneyStep::LoadSaved,
                JourneyStep::DeletePhoto {
                    filepath: GalleryDataGenerator::direct_photo(0).filepath,
                },
            ],
            ExpectedOutcome {
                // Persist-before-delete already wrote the pruned manifest
                gallery_len: 1,
                persisted_len: Some(0),
                persist_calls: 1,
                delete_calls: 1,
                should_succeed: false,
                expected_error: Some("NotFound".to_string()),
                ..Default::default()
            },
        )
        .with_tags(vec!["delete", "error", "edge-case"])
    }

    /// Scenario: Manifest carries the same filepath twice
    pub fn duplicate_filepaths() -> GalleryScenario {
        let dup = GalleryDataGenerator::direct_photo(0);
        let other = GalleryDataGenerator::direct_photo(1);

        let mut fixtures = ScenarioFixtures::direct();
        fixtures.stored_manifest = Some(
            encode_manifest(&[dup.clone(), other, dup.clone()])
                .expect("seed manifest encodes"),
        );
        fixtures.stored_files = vec![
            (
                GalleryDataGenerator::photo_file_name(0),
                GalleryDataGenerator::generate_jpeg(256, 0),
            ),
            (
                GalleryDataGenerator::photo_file_name(1),
                GalleryDataGenerator::generate_jpeg(256, 1),
            ),
        ];

        GalleryScenario::new(
            "duplicate_filepaths",
            "Deleting a duplicated filepath removes every entry that carries it",
            fixtures,
            vec![
                JourneyStep::LoadSaved,
                JourneyStep::DeletePhoto {
                    filepath: dup.filepath,
                },
            ],
            ExpectedOutcome {
                gallery_len: 1,
                persisted_len: Some(1),
                persist_calls: 1,
                delete_calls: 1,
                should_succeed: true,
                ..Default::default()
            },
        )
        .with_tags(vec!["delete", "edge-case"])
    }

    // =========================================================================
    // HELPER FUNCTIONS
    // =========================================================================

    /// Fixtures with `count` photos seeded on a direct-access store
    ///
    /// The manifest is written newest-first, the way the store would have
    /// left it, and every entry has its file staged in the data directory.
    fn seeded_direct_fixtures(count: usize) -> ScenarioFixtures {
        let photos: Vec<Photo> = (0..count)
            .rev()
            .map(GalleryDataGenerator::direct_photo)
            .collect();

        let mut fixtures = ScenarioFixtures::direct();
        fixtures.stored_manifest =
            Some(encode_manifest(&photos).expect("seed manifest encodes"));
        fixtures.stored_files = (0..count)
            .map(|i| {
                (
                    GalleryDataGenerator::photo_file_name(i),
                    GalleryDataGenerator::generate_jpeg(512, i as u64),
                )
            })
            .collect();
        fixtures
    }

    /// Fixtures with `count` photos seeded on a materializing store
    fn seeded_web_fixtures(count: usize) -> ScenarioFixtures {
        let photos: Vec<Photo> = (0..count)
            .rev()
            .map(GalleryDataGenerator::web_photo)
            .collect();

        let mut fixtures = ScenarioFixtures::materializing();
        fixtures.stored_manifest =
            Some(encode_manifest(&photos).expect("seed manifest encodes"));
        fixtures.stored_files = (0..count)
            .map(|i| {
                (
                    GalleryDataGenerator::photo_file_name(i),
                    GalleryDataGenerator::generate_jpeg(512, i as u64),
                )
            })
            .collect();
        fixtures
    }

    /// A capture reachable through the local filesystem
    fn staged_direct_capture(seed: u64) -> StagedCapture {
        StagedCapture {
            reference: format!("/captures/incoming_{}.jpeg", seed),
            bytes: GalleryDataGenerator::generate_jpeg(1024, seed),
        }
    }

    /// A capture reachable only through a temporary web URL
    fn staged_web_capture(seed: u64) -> StagedCapture {
        StagedCapture {
            reference: format!("blob:camera/capture-{}", seed),
            bytes: GalleryDataGenerator::generate_jpeg(1024, seed),
        }
    }

    /// Get all available scenarios
    pub fn all_scenarios() -> Vec<GalleryScenario> {
        vec![
            Self::empty_gallery(),
            Self::seeded_direct(),
            Self::seeded_web(),
            Self::capture_direct(),
            Self::capture_web(),
            Self::capture_cancelled(),
            Self::permission_denied(),
            Self::storage_failure_divergence(),
            Self::delete_journey(),
            Self::sheet_dismissed(),
            Self::selection_held(),
            Self::delete_missing_file(),
            Self::duplicate_filepaths(),
        ]
    }

    /// Get scenarios by tag
    pub fn scenarios_by_tag(tag: &str) -> Vec<GalleryScenario> {
        Self::all_scenarios()
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Get quick scenarios covering the main journeys
    pub fn quick_scenarios() -> Vec<GalleryScenario> {
        vec![
            Self::empty_gallery(),
            Self::capture_direct(),
            Self::capture_cancelled(),
            Self::delete_journey(),
            Self::sheet_dismissed(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_load() {
        let scenarios = ScenarioLibrary::all_scenarios();
        assert!(!scenarios.is_empty());
        println!("Loaded {} gallery scenarios", scenarios.len());
    }

    #[test]
    fn test_scenario_names_are_unique() {
        let scenarios = ScenarioLibrary::all_scenarios();
        let mut names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_scenario_by_tag() {
        let error_scenarios = ScenarioLibrary::scenarios_by_tag("error");
        assert!(!error_scenarios.is_empty());
        for s in &error_scenarios {
            assert!(s.tags.contains(&"error".to_string()));
        }
    }

    #[test]
    fn test_failing_scenarios_name_their_error() {
        for scenario in ScenarioLibrary::all_scenarios() {
            if !scenario.expected.should_succeed {
                assert!(
                    scenario.expected.expected_error.is_some(),
                    "scenario {} fails without naming an error",
                    scenario.name
                );
            }
        }
    }

    #[test]
    fn test_quick_scenarios() {
        let quick = ScenarioLibrary::quick_scenarios();
        assert_eq!(quick.len(), 5);
    }

    #[test]
    fn test_seeded_fixtures_stage_every_file() {
        let fixtures = ScenarioLibrary::seeded_direct_fixtures(3);
        assert_eq!(fixtures.stored_files.len(), 3);
        assert!(fixtures.stored_manifest.is_some());
    }
}
