//! Journey runner for executing scenarios and generating reports
//!
//! This module builds a fully mocked store from a scenario's fixtures, drives
//! the scenario's script against it step by step, and checks the final state
//! against the expected outcome.

use super::mocks::{MockCamera, MockFileStore, MockPreferenceStore, MockWebResources};
use super::scenarios::{
    ExpectedOutcome, GalleryScenario, JourneyStep, ProfileKind, ScenarioFixtures, ScenarioLibrary,
};
use crate::core::error::{GalleryError, Result};
use crate::core::photo::{decode_manifest, Photo};
use crate::core::store::PhotoGalleryStore;
use crate::platform::{
    CapabilityProfile, CapturedPhoto, DirectAccessProfile, MaterializingProfile, StorageDirectory,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of running a single scenario
#[derive(Debug, Clone)]
pub struct JourneyReport {
    /// Scenario name
    pub name: String,
    /// Whether the journey matched its expected outcome
    pub passed: bool,
    /// Execution time
    pub duration: Duration,
    /// Steps executed before the script ended or errored
    pub steps_run: usize,
    /// Photos left in the gallery when the script ended
    pub gallery_len: usize,
    /// Failure reason (if any)
    pub failure_reason: Option<String>,
}

impl JourneyReport {
    /// Create a passing report
    pub fn passed(name: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            duration,
            steps_run: 0,
            gallery_len: 0,
            failure_reason: None,
        }
    }

    /// Create a failing report
    pub fn failed(name: &str, duration: Duration, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            duration,
            steps_run: 0,
            gallery_len: 0,
            failure_reason: Some(reason.to_string()),
        }
    }

    /// Attach what the journey actually observed
    pub fn with_observed(mut self, steps_run: usize, gallery_len: usize) -> Self {
        self.steps_run = steps_run;
        self.gallery_len = gallery_len;
        self
    }
}

/// Summary of a whole run
#[derive(Debug, Clone, Default)]
pub struct JourneySummary {
    /// Total scenarios run
    pub total: usize,
    /// Scenarios that passed
    pub passed: usize,
    /// Scenarios that failed
    pub failed: usize,
    /// Total execution time
    pub total_duration: Duration,
    /// Individual reports, in run order
    pub reports: Vec<JourneyReport>,
}

impl JourneySummary {
    /// Calculate pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Get all failed scenario names
    pub fn failed_scenarios(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Configuration for the journey runner
#[derive(Debug, Clone)]
pub struct JourneyRunnerConfig {
    /// Whether to print progress and results while running
    pub verbose: bool,
    /// Whether to stop on first failure
    pub fail_fast: bool,
    /// Filter scenarios by tags
    pub tag_filter: Option<Vec<String>>,
    /// Filter scenarios by name substring
    pub name_filter: Option<String>,
}

impl Default for JourneyRunnerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            fail_fast: false,
            tag_filter: None,
            name_filter: None,
        }
    }
}

/// A store wired from scenario fixtures, with handles to the mocks behind it
///
/// The handles stay observable after the store takes its own clones, so a
/// journey (or a test) can assert on what actually reached each collaborator.
pub struct JourneyEnvironment {
    /// The store under test
    pub store: PhotoGalleryStore,
    /// Camera handing out the staged captures
    pub camera: Arc<MockCamera>,
    /// File store seeded with the scenario's files
    pub files: Arc<MockFileStore>,
    /// Preference store seeded with the scenario's manifest
    pub prefs: Arc<MockPreferenceStore>,
}

/// Build a fully mocked store from scenario fixtures
pub fn build_environment(fixtures: &ScenarioFixtures) -> JourneyEnvironment {
    let mut camera = MockCamera::new();
    if fixtures.deny_permission {
        camera = camera.with_permission_denied();
    }
    for capture in &fixtures.staged_captures {
        let captured = match fixtures.profile {
            ProfileKind::Direct => CapturedPhoto::from_source_path(capture.reference.as_str()),
            ProfileKind::Materializing => CapturedPhoto::from_web_path(capture.reference.as_str()),
        };
        camera = camera.with_capture(captured);
    }

    let mut files = MockFileStore::new();
    for (name, data) in &fixtures.stored_files {
        files = files.with_file(name, StorageDirectory::Data, data.clone());
    }
    if fixtures.profile == ProfileKind::Direct {
        for capture in &fixtures.staged_captures {
            files = files.with_external_file(capture.reference.as_str(), capture.bytes.clone());
        }
    }
    if fixtures.fail_delete {
        files = files.with_failing_delete();
    }

    let mut prefs = MockPreferenceStore::new();
    if let Some(ref manifest) = fixtures.stored_manifest {
        prefs = prefs.with_value(&fixtures.settings.manifest_key, manifest);
    }
    if fixtures.fail_persist {
        prefs = prefs.with_failing_set();
    }

    let mut web = MockWebResources::new();
    if fixtures.profile == ProfileKind::Materializing {
        for capture in &fixtures.staged_captures {
            web = web.with_resource(&capture.reference, capture.bytes.clone());
        }
    }

    let camera = Arc::new(camera);
    let files = Arc::new(files);
    let prefs = Arc::new(prefs);
    let web = Arc::new(web);

    let profile: Arc<dyn CapabilityProfile> = match fixtures.profile {
        ProfileKind::Direct => Arc::new(DirectAccessProfile::new(files.clone())),
        ProfileKind::Materializing => {
            Arc::new(MaterializingProfile::new(files.clone(), web.clone()))
        }
    };

    let store = PhotoGalleryStore::new(
        camera.clone(),
        files.clone(),
        prefs.clone(),
        profile,
        fixtures.settings.clone(),
    );

    JourneyEnvironment {
        store,
        camera,
        files,
        prefs,
    }
}

/// Journey runner for executing scenarios
pub struct JourneyRunner {
    /// Configuration
    config: JourneyRunnerConfig,
    /// Reports from the current run
    reports: Vec<JourneyReport>,
}

impl JourneyRunner {
    /// Create a new runner with default configuration
    pub fn new() -> Self {
        Self {
            config: JourneyRunnerConfig::default(),
            reports: Vec::new(),
        }
    }

    /// Create a new runner with configuration
    pub fn with_config(config: JourneyRunnerConfig) -> Self {
        Self {
            config,
            reports: Vec::new(),
        }
    }

    /// Run all available scenarios
    pub async fn run_all(&mut self) -> JourneySummary {
        let scenarios = ScenarioLibrary::all_scenarios();
        self.run_scenarios(scenarios).await
    }

    /// Run quick scenarios only
    pub async fn run_quick(&mut self) -> JourneySummary {
        let scenarios = ScenarioLibrary::quick_scenarios();
        self.run_scenarios(scenarios).await
    }

    /// Run scenarios filtered by tag
    pub async fn run_by_tag(&mut self, tag: &str) -> JourneySummary {
        let scenarios = ScenarioLibrary::scenarios_by_tag(tag);
        self.run_scenarios(scenarios).await
    }

    /// Run a list of scenarios
    pub async fn run_scenarios(&mut self, scenarios: Vec<GalleryScenario>) -> JourneySummary {
        let start = Instant::now();
        self.reports.clear();

        let filtered = self.filter_scenarios(scenarios);

        if self.config.verbose {
            println!("\nRunning {} gallery scenario(s)\n", filtered.len());
        }

        for scenario in &filtered {
            let report = self.run_single_scenario(scenario).await;

            if self.config.verbose {
                Self::print_report(&report);
            }

            let should_stop = self.config.fail_fast && !report.passed;
            self.reports.push(report);

            if should_stop {
                if self.config.verbose {
                    println!("\nStopping early due to fail-fast mode\n");
                }
                break;
            }
        }

        let summary = self.summarize(start.elapsed());

        if self.config.verbose {
            Self::print_summary(&summary);
        }

        summary
    }

    /// Filter scenarios based on configuration
    fn filter_scenarios(&self, scenarios: Vec<GalleryScenario>) -> Vec<GalleryScenario> {
        let mut filtered = scenarios;

        if let Some(ref tags) = self.config.tag_filter {
            filtered = filtered
                .into_iter()
                .filter(|s| s.tags.iter().any(|t| tags.contains(t)))
                .collect();
        }

        if let Some(ref pattern) = self.config.name_filter {
            let pattern_lower = pattern.to_lowercase();
            filtered = filtered
                .into_iter()
                .filter(|s| s.name.to_lowercase().contains(&pattern_lower))
                .collect();
        }

        filtered
    }

    /// Run a single scenario from fixtures to verdict
    pub async fn run_single_scenario(&self, scenario: &GalleryScenario) -> JourneyReport {
        let start = Instant::now();

        if self.config.verbose {
            println!("Running: {} - {}", scenario.name, scenario.description);
        }

        let env = build_environment(&scenario.fixtures);
        let mut steps_run = 0;
        let mut failure: Option<GalleryError> = None;

        for step in &scenario.script {
            steps_run += 1;
            if let Err(e) = Self::execute_step(&env, step).await {
                failure = Some(e);
                break;
            }
        }

        let duration = start.elapsed();
        let mut mismatches = Vec::new();

        match (&failure, scenario.expected.should_succeed) {
            (Some(err), true) => {
                mismatches.push(format!("step {} failed: {}", steps_run, err));
            }
            (Some(err), false) => {
                if let Some(ref fragment) = scenario.expected.expected_error {
                    let debug = format!("{:?}", err);
                    if !debug.contains(fragment) {
                        mismatches.push(format!(
                            "expected error containing {:?}, got {}",
                            fragment, debug
                        ));
                    }
                }
            }
            (None, false) => {
                mismatches.push("script completed but a failure was expected".to_string());
            }
            (None, true) => {}
        }

        // State checks run even after an expected error; divergence scenarios
        // depend on seeing what the failure left behind.
        mismatches.extend(Self::verify_outcome(
            &env,
            &scenario.expected,
            &scenario.fixtures.settings.manifest_key,
        ));

        let gallery_len = env.store.photos().len();
        if mismatches.is_empty() {
            JourneyReport::passed(&scenario.name, duration).with_observed(steps_run, gallery_len)
        } else {
            JourneyReport::failed(&scenario.name, duration, &mismatches.join("; "))
                .with_observed(steps_run, gallery_len)
        }
    }

    /// Execute one script step against the environment
    async fn execute_step(env: &JourneyEnvironment, step: &JourneyStep) -> Result<()> {
        match step {
            JourneyStep::LoadSaved => {
                env.store.load_saved().await?;
            }
            JourneyStep::TakePhoto => {
                env.store.take_photo().await?;
            }
            JourneyStep::DeletePhoto { filepath } => {
                let photo = Self::find_photo(env, filepath);
                env.store.delete_photo(&photo).await?;
            }
            JourneyStep::SelectPendingDelete { filepath } => {
                let photo = Self::find_photo(env, filepath);
                env.store.set_pending_delete(Some(photo));
            }
            JourneyStep::ConfirmPendingDelete => {
                env.store.confirm_pending_delete().await?;
            }
            JourneyStep::CancelPendingDelete => {
                env.store.set_pending_delete(None);
            }
        }
        Ok(())
    }

    /// Resolve a filepath to the published photo carrying it
    ///
    /// Falls back to a bare entry so scripts can also target photos that
    /// were never published.
    fn find_photo(env: &JourneyEnvironment, filepath: &str) -> Photo {
        env.store
            .photos()
            .into_iter()
            .find(|p| p.filepath == filepath)
            .unwrap_or_else(|| Photo::new(filepath))
    }

    /// Compare the environment's final state with the expected outcome
    fn verify_outcome(
        env: &JourneyEnvironment,
        expected: &ExpectedOutcome,
        manifest_key: &str,
    ) -> Vec<String> {
        let mut mismatches = Vec::new();
        let photos = env.store.photos();

        if photos.len() != expected.gallery_len {
            mismatches.push(format!(
                "gallery has {} photos, expected {}",
                photos.len(),
                expected.gallery_len
            ));
        }

        if let Some(expected_len) = expected.persisted_len {
            match env.prefs.stored_value(manifest_key) {
                Some(raw) => match decode_manifest(&raw) {
                    Ok(entries) if entries.len() == expected_len => {}
                    Ok(entries) => mismatches.push(format!(
                        "manifest has {} entries, expected {}",
                        entries.len(),
                        expected_len
                    )),
                    Err(e) => mismatches.push(format!("stored manifest does not decode: {}", e)),
                },
                None => mismatches.push("no manifest was persisted".to_string()),
            }
        }

        let persist_calls = env.prefs.set_calls();
        if persist_calls != expected.persist_calls {
            mismatches.push(format!(
                "{} manifest write(s) reached storage, expected {}",
                persist_calls, expected.persist_calls
            ));
        }

        let delete_calls = env.files.deleted().len();
        if delete_calls != expected.delete_calls {
            mismatches.push(format!(
                "{} delete call(s) were issued, expected {}",
                delete_calls, expected.delete_calls
            ));
        }

        if expected.materialized {
            if photos.iter().any(|p| p.inline_data.is_none()) {
                mismatches.push("photos were not materialized for rendering".to_string());
            }
        } else if photos.iter().any(|p| p.inline_data.is_some()) {
            mismatches.push("photos carry unexpected inline data".to_string());
        }

        let pending = env.store.pending_delete().map(|p| p.filepath);
        if pending != expected.pending_selection {
            mismatches.push(format!(
                "pending selection is {:?}, expected {:?}",
                pending, expected.pending_selection
            ));
        }

        mismatches
    }

    /// Build the summary for the current run
    fn summarize(&self, total_duration: Duration) -> JourneySummary {
        JourneySummary {
            total: self.reports.len(),
            passed: self.reports.iter().filter(|r| r.passed).count(),
            failed: self.reports.iter().filter(|r| !r.passed).count(),
            total_duration,
            reports: self.reports.clone(),
        }
    }

    /// Print a single report to the console
    fn print_report(report: &JourneyReport) {
        let (status, color) = if report.passed {
            ("PASS", "\x1b[32m")
        } else {
            ("FAIL", "\x1b[31m")
        };
        println!(
            "  {}{}\x1b[0m  {} ({} step(s), {} photo(s), {:.1?})",
            color, status, report.name, report.steps_run, report.gallery_len, report.duration
        );
        if let Some(ref reason) = report.failure_reason {
            println!("        {}", reason);
        }
    }

    /// Print the run summary to the console
    fn print_summary(summary: &JourneySummary) {
        println!(
            "\n{} scenario(s): {} passed, {} failed ({:.1}%) in {:.1?}",
            summary.total,
            summary.passed,
            summary.failed,
            summary.pass_rate(),
            summary.total_duration
        );
        if summary.failed > 0 {
            println!("Failed: {}", summary.failed_scenarios().join(", "));
        }
    }
}

impl Default for JourneyRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quick_scenarios_pass() {
        let mut runner = JourneyRunner::new();
        let summary = runner.run_quick().await;
        assert_eq!(summary.failed, 0, "failed: {:?}", summary.failed_scenarios());
        assert_eq!(summary.total, 5);
    }

    #[tokio::test]
    async fn test_all_scenarios_pass() {
        let mut runner = JourneyRunner::new();
        let summary = runner.run_all().await;
        assert_eq!(summary.failed, 0, "failed: {:?}", summary.failed_scenarios());
        assert!((summary.pass_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_tag_filter_limits_run() {
        let config = JourneyRunnerConfig {
            tag_filter: Some(vec!["sheet".to_string()]),
            ..Default::default()
        };
        let mut runner = JourneyRunner::with_config(config);
        let summary = runner.run_all().await;
        assert!(summary.total > 0);
        assert!(summary.total < ScenarioLibrary::all_scenarios().len());
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_name_filter_matches_substring() {
        let config = JourneyRunnerConfig {
            name_filter: Some("capture".to_string()),
            ..Default::default()
        };
        let mut runner = JourneyRunner::with_config(config);
        let summary = runner.run_all().await;
        assert!(summary.total >= 3);
        for report in &summary.reports {
            assert!(report.name.contains("capture"));
        }
    }

    #[tokio::test]
    async fn test_wrong_expectation_is_reported() {
        let mut scenario = ScenarioLibrary::empty_gallery();
        scenario.expected.gallery_len = 5;

        let runner = JourneyRunner::new();
        let report = runner.run_single_scenario(&scenario).await;
        assert!(!report.passed);
        let reason = report.failure_reason.unwrap();
        assert!(reason.contains("gallery has 0 photos"), "got: {}", reason);
    }

    #[tokio::test]
    async fn test_environment_exposes_mock_handles() {
        let scenario = ScenarioLibrary::capture_direct();
        let env = build_environment(&scenario.fixtures);

        env.store.load_saved().await.unwrap();
        env.store.take_photo().await.unwrap();

        assert_eq!(env.camera.request_count(), 1);
        assert_eq!(env.prefs.set_calls(), 1);
        assert_eq!(
            env.files.written_names(StorageDirectory::Data).len(),
            1
        );
    }
}
