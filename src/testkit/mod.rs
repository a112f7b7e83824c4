//! Gallery Test Kit
//!
//! This module provides a testing framework for the camera-roll gallery that
//! exercises every user journey without a real camera, filesystem, or web
//! runtime behind it.
//!
//! Note: Some helpers in this module are intentionally kept for API
//! completeness even if not currently used by the CLI.
//!
//! # Features
//!
//! - **Mock Platform**: Camera, file store, preferences, and web resources
//!   with scripted captures and failure injection
//! - **Data Generators**: Seeded photo bytes and manifest entries
//! - **Scenarios**: Pre-built journeys covering loads, captures, deletions,
//!   and failure conditions
//! - **Journey Runner**: Execute scenarios and report pass/fail
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use camera_roll::testkit::JourneyRunner;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Run the quick scenarios
//!     let mut runner = JourneyRunner::new();
//!     let summary = runner.run_quick().await;
//!     println!("Passed: {}/{}", summary.passed, summary.total);
//! }
//! ```
//!
//! # Available Scenarios
//!
//! ## Loading
//! - `empty_gallery` - First launch with nothing stored
//! - `seeded_direct` - Relaunch on a direct-access store
//! - `seeded_web` - Relaunch that re-inlines photo data
//!
//! ## Capturing
//! - `capture_direct` - Capture with direct file access
//! - `capture_web` - Capture fetched over a web URL
//! - `capture_cancelled` - User backs out of the camera
//! - `permission_denied` - Camera permission denied
//! - `storage_failure_divergence` - Manifest write fails after publication
//!
//! ## Deleting
//! - `delete_journey` - Select, confirm, and remove a photo
//! - `sheet_dismissed` - Dismiss the confirmation sheet
//! - `selection_held` - Selection persists while the sheet is open
//! - `delete_missing_file` - Entry whose stored file has gone missing
//! - `duplicate_filepaths` - Manifest carries the same filepath twice

#![allow(dead_code)]

pub mod generator;
pub mod journeys;
pub mod mocks;
pub mod scenarios;

// Re-export commonly used types for convenience
pub use generator::{GalleryDataGenerator, BASE_CAPTURE_MILLIS, TEST_JPEG_SIZE};
pub use journeys::{
    build_environment, JourneyEnvironment, JourneyReport, JourneyRunner, JourneyRunnerConfig,
    JourneySummary,
};
pub use mocks::{MockCamera, MockFileStore, MockPreferenceStore, MockWebResources};
pub use scenarios::{
    ExpectedOutcome, GalleryScenario, JourneyStep, ProfileKind, ScenarioFixtures, ScenarioLibrary,
    StagedCapture,
};

/// Prelude module for easy imports
pub mod prelude {
    pub use super::generator::GalleryDataGenerator;
    pub use super::journeys::{build_environment, JourneyRunner, JourneyRunnerConfig};
    pub use super::mocks::{MockCamera, MockFileStore, MockPreferenceStore, MockWebResources};
    pub use super::scenarios::{GalleryScenario, JourneyStep, ScenarioLibrary};
}

/// Run all scenarios with verbose output
pub async fn run_all_journeys() -> JourneySummary {
    let mut runner = JourneyRunner::with_config(JourneyRunnerConfig {
        verbose: true,
        ..Default::default()
    });
    runner.run_all().await
}

/// Run the quick scenarios with verbose output
pub async fn run_quick_journeys() -> JourneySummary {
    let mut runner = JourneyRunner::with_config(JourneyRunnerConfig {
        verbose: true,
        ..Default::default()
    });
    runner.run_quick().await
}

/// Run scenarios matching a tag with verbose output
pub async fn run_journeys_by_tag(tag: &str) -> JourneySummary {
    let mut runner = JourneyRunner::with_config(JourneyRunnerConfig {
        verbose: true,
        ..Default::default()
    });
    runner.run_by_tag(tag).await
}

/// Get a list of all available scenario names
pub fn list_scenario_names() -> Vec<String> {
    ScenarioLibrary::all_scenarios()
        .into_iter()
        .map(|s| s.name)
        .collect()
}

/// Get a list of all available tags
pub fn list_tags() -> Vec<String> {
    let mut tags: Vec<String> = ScenarioLibrary::all_scenarios()
        .into_iter()
        .flat_map(|s| s.tags)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Print available scenarios to console, grouped by their first tag
pub fn print_available_scenarios() {
    println!("\nAvailable gallery scenarios:\n");

    let scenarios = ScenarioLibrary::all_scenarios();

    let mut by_category: std::collections::HashMap<String, Vec<&GalleryScenario>> =
        std::collections::HashMap::new();

    for scenario in &scenarios {
        let category = scenario
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| "other".to_string());
        by_category.entry(category).or_default().push(scenario);
    }

    let mut categories: Vec<_> = by_category.keys().cloned().collect();
    categories.sort();

    for category in categories {
        println!("{}", category.to_uppercase());
        if let Some(scenarios) = by_category.get(&category) {
            for scenario in scenarios {
                println!("   {} - {}", scenario.name, scenario.description);
            }
        }
        println!();
    }

    println!("Total: {} scenarios available\n", scenarios.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all exports are accessible
        let _ = MockCamera::new();
        let _ = MockFileStore::new();
        let _ = MockPreferenceStore::new();
        let _ = JourneyRunner::new();
        let _ = ScenarioLibrary::quick_scenarios();
    }

    #[test]
    fn test_list_functions() {
        let names = list_scenario_names();
        assert!(!names.is_empty());

        let tags = list_tags();
        assert!(!tags.is_empty());
    }

    #[tokio::test]
    async fn test_quick_journeys_run() {
        let summary = run_quick_journeys().await;
        assert!(summary.total > 0);
    }
}
