//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    format_bytes, format_duration, print_error, print_header, print_info, print_success,
    print_warning, ImportProgress,
};
use crate::cli::{Args, Commands, SimulateCommands};
use crate::core::config::{get_config_path, init_config, open_config_in_editor, Config};
use crate::core::photo::Photo;
use crate::core::store::{PhotoGalleryStore, StoreSettings};
use crate::platform::{DirectAccessProfile, FileImportCamera, JsonPreferenceStore, LocalFileStore};
use crate::testkit::{self, GalleryScenario, JourneyRunner, JourneyRunnerConfig, ScenarioLibrary};
use crate::ui::view::{ActionSheetState, ButtonRole, GalleryGrid, RenderSource};
use anyhow::Result;
use dialoguer::Confirm;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use walkdir::WalkDir;

/// File extensions recognized when scanning directories for import
const IMPORT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "webp"];

/// A gallery store wired to the local filesystem collaborators
///
/// The camera handle stays accessible so the import command can queue the
/// files it wants "captured".
struct LocalGallery {
    store: PhotoGalleryStore,
    camera: Arc<FileImportCamera>,
}

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Some(Commands::Config { path, reset }) => {
            handle_config_command(*path, *reset)?;
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::ShowConfig) => {
            show_config(config);
        }
        Some(Commands::List { columns, verbose }) => {
            list_photos(config, *columns, *verbose)?;
        }
        None => {
            // No subcommand defaults to showing the gallery
            list_photos(config, GalleryGrid::DEFAULT_COLUMNS, false)?;
        }
        Some(Commands::Import { paths, recursive }) => {
            import_photos(config, paths, *recursive, shutdown_flag)?;
        }
        Some(Commands::Delete { filepath, yes }) => {
            delete_photo(config, filepath, *yes)?;
        }
        Some(Commands::Simulate { simulate_command }) => {
            handle_simulate_command(simulate_command)?;
        }
    }

    Ok(())
}

/// Open the gallery store backed by the configured storage root
fn open_gallery(config: &Config) -> Result<LocalGallery> {
    let root = config.storage.effective_root();
    debug!("Opening gallery at {}", root.display());

    let files = Arc::new(LocalFileStore::open(&root)?);
    let prefs = Arc::new(JsonPreferenceStore::open(config.storage.preferences_path())?);
    let camera = Arc::new(FileImportCamera::new());
    let profile = Arc::new(DirectAccessProfile::new(files.clone()));

    let store = PhotoGalleryStore::new(
        camera.clone(),
        files,
        prefs,
        profile,
        StoreSettings::from_config(config),
    );

    Ok(LocalGallery { store, camera })
}

// ============================================================================
// List command
// ============================================================================

/// List the saved photos, newest first, laid out as the gallery grid
pub fn list_photos(config: &Config, columns: usize, verbose: bool) -> Result<()> {
    let gallery = open_gallery(config)?;
    let runtime = Runtime::new()?;
    let photos = runtime.block_on(gallery.store.load_saved())?;

    if photos.is_empty() {
        print_info("The gallery is empty");
        print_info("Import photos with: camera-roll import <FILES>");
        return Ok(());
    }

    let grid = GalleryGrid::with_columns(&photos, columns);
    print_header("CAMERA ROLL");

    for (row_idx, row) in grid.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let index = row_idx * grid.columns() + col_idx;
            println!("  [{:>3}] {}", index, cell.photo.file_name());

            if verbose {
                println!("        filepath: {}", cell.photo.filepath);
                match cell.render_source() {
                    RenderSource::InlineData(data) => {
                        println!("        renders via: inline data ({})", format_bytes(data.len() as u64));
                    }
                    RenderSource::DisplayPath(path) => {
                        println!("        renders via: {}", path);
                    }
                    RenderSource::Missing => {
                        println!("        renders via: (nothing renderable)");
                    }
                }
            }
        }
    }

    println!();
    print_info(&format!(
        "{} photo(s) in {} row(s) of {} column(s)",
        grid.len(),
        grid.rows().len(),
        grid.columns()
    ));
    Ok(())
}

// ============================================================================
// Import command
// ============================================================================

/// Import local image files into the gallery as sequential captures
pub fn import_photos(
    config: &Config,
    paths: &[PathBuf],
    recursive: bool,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    let files = collect_image_files(paths, recursive)?;
    if files.is_empty() {
        print_warning("No image files found to import");
        return Ok(());
    }

    info!("Importing {} file(s) into the gallery", files.len());

    let gallery = open_gallery(config)?;
    for file in &files {
        gallery.camera.enqueue(file.clone());
    }

    let runtime = Runtime::new()?;
    runtime.block_on(gallery.store.load_saved())?;

    let progress = ImportProgress::new(files.len() as u64);
    let start = Instant::now();
    let mut imported = 0usize;
    let mut failed = 0usize;

    for (i, file) in files.iter().enumerate() {
        // The shutdown flag is honored between captures, never inside one
        if shutdown_flag.load(Ordering::SeqCst) {
            progress.log_warning("Shutdown requested, stopping import");
            break;
        }

        // Saved file names are capture-time milliseconds; pace sequential
        // captures one tick apart so they cannot land on the same name.
        if i > 0 {
            thread::sleep(Duration::from_millis(2));
        }

        let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        match runtime.block_on(gallery.store.take_photo()) {
            Ok(photo) => {
                imported += 1;
                progress.file_completed(photo.file_name(), size);
            }
            Err(e) => {
                failed += 1;
                progress.file_failed(&file.display().to_string());
                progress.log_warning(&format!("{}: {}", file.display(), e));
            }
        }
    }

    progress.finish();
    println!();

    if failed > 0 {
        print_warning(&format!("{} file(s) could not be imported", failed));
    }
    print_success(&format!(
        "Imported {} photo(s) ({}) in {}",
        imported,
        format_bytes(progress.bytes_processed()),
        format_duration(start.elapsed())
    ));
    Ok(())
}

/// Expand the given paths into a list of importable image files
///
/// Directories are scanned for known image extensions (one level deep
/// unless `recursive`); explicitly named files are taken as-is.
fn collect_image_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_image_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }

    Ok(files)
}

/// Whether a path carries one of the recognized image extensions
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMPORT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// ============================================================================
// Delete command
// ============================================================================

/// Delete a photo after the confirmation-sheet prompt
pub fn delete_photo(config: &Config, filepath: &str, skip_confirm: bool) -> Result<()> {
    let gallery = open_gallery(config)?;
    let runtime = Runtime::new()?;
    let photos = runtime.block_on(gallery.store.load_saved())?;

    let photo = match find_photo(&photos, filepath) {
        Some(photo) => photo,
        None => {
            print_error(&format!("No saved photo matches '{}'", filepath));
            print_info("Run 'camera-roll list' to see the saved photos");
            anyhow::bail!("photo not found: {}", filepath);
        }
    };

    gallery.store.set_pending_delete(Some(photo.clone()));

    if !skip_confirm {
        // The prompt mirrors the gallery's confirmation sheet: same title,
        // same destructive/cancel pairing, dismissal clears the selection.
        if let Some(sheet) = ActionSheetState::for_pending(Some(&photo)) {
            println!();
            println!("  {}", sheet.title);
            for button in &sheet.buttons {
                let marker = match button.role {
                    ButtonRole::Destructive => "!",
                    ButtonRole::Cancel => " ",
                };
                println!("   {} {}", marker, button.label);
            }

            let confirmed = Confirm::new()
                .with_prompt(format!("  Delete {}?", photo.file_name()))
                .default(false)
                .interact()?;

            if !confirmed {
                gallery.store.set_pending_delete(None);
                info!("Deletion cancelled");
                return Ok(());
            }
        }
    }

    match runtime.block_on(gallery.store.confirm_pending_delete())? {
        Some(deleted) => {
            print_success(&format!("Deleted {}", deleted.file_name()));
        }
        None => {
            print_warning("Nothing was selected for deletion");
        }
    }
    Ok(())
}

/// Resolve the user-supplied identifier to a saved photo
///
/// Accepts the full filepath or the bare file name, matching how photos
/// are shown by `list`.
fn find_photo(photos: &[Photo], needle: &str) -> Option<Photo> {
    photos
        .iter()
        .find(|p| p.filepath == needle)
        .or_else(|| photos.iter().find(|p| p.file_name() == needle))
        .cloned()
}

// ============================================================================
// Config commands
// ============================================================================

/// Handle the config command: open, show path, or reset
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        // Delete existing config and create a fresh one
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                std::fs::remove_file(&config_path)?;
                info!("Removed existing config file");
            }
        }
        let path = init_config()?;
        info!("Created fresh config file at: {}", path.display());
        return Ok(());
    }

    if show_path {
        // Just show the path
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    // Open the config file in the default editor
    info!("Opening configuration file in default editor...");
    match open_config_in_editor() {
        Ok(path) => {
            info!("Config file: {}", path.display());
            info!("Save the file after editing to apply changes.");
            info!("Run 'camera-roll show-config' to verify your settings.");
        }
        Err(e) => {
            error!("Failed to open config file: {}", e);
            // Fall back to showing the path
            if let Some(path) = get_config_path() {
                info!("You can manually edit the config at: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let custom_path = output.is_some();
    let output_path = match output {
        Some(path) => path,
        None => {
            // Use standard location
            init_config()?
        }
    };

    // If a specific path was given, write the config there
    if custom_path {
        let content = Config::generate_default_config();
        std::fs::write(&output_path, content)?;
    }

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize the gallery settings.");
    info!("");
    info!("Quick tip: Run 'camera-roll config' to open the config in your editor.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[storage]");
    info!("  root = \"{}\"", config.storage.root.display());
    info!(
        "  (effective root: {})",
        config.storage.effective_root().display()
    );
    info!("  manifest_key = \"{}\"", config.storage.manifest_key);
    info!(
        "  preferences_file = \"{}\"",
        config.storage.preferences_file
    );
    info!(
        "  (preferences path: {})",
        config.storage.preferences_path().display()
    );
    info!("");
    info!("[capture]");
    info!("  quality = {}", config.capture.quality);
    info!("  file_extension = \"{}\"", config.capture.file_extension);
    info!("  source = {:?}", config.capture.source);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}

// ============================================================================
// Simulate commands
// ============================================================================

/// Handle simulate subcommands
pub fn handle_simulate_command(simulate_command: &SimulateCommands) -> Result<()> {
    match simulate_command {
        SimulateCommands::RunAll { fail_fast } => {
            simulate_run_all(*fail_fast)?;
        }
        SimulateCommands::RunQuick { verbose } => {
            simulate_run_quick(*verbose)?;
        }
        SimulateCommands::RunTag { tag, verbose } => {
            simulate_run_by_tag(tag, *verbose)?;
        }
        SimulateCommands::Run { scenarios, verbose } => {
            simulate_run_scenarios(scenarios, *verbose)?;
        }
        SimulateCommands::ListScenarios { tag, detailed } => {
            simulate_list_scenarios(tag.as_deref(), *detailed)?;
        }
        SimulateCommands::ListTags => {
            simulate_list_tags()?;
        }
        SimulateCommands::Info { name } => {
            simulate_scenario_info(name)?;
        }
    }
    Ok(())
}

/// Run all scenarios
fn simulate_run_all(fail_fast: bool) -> Result<()> {
    let runner_config = JourneyRunnerConfig {
        verbose: true,
        fail_fast,
        ..Default::default()
    };

    let runtime = Runtime::new()?;
    let mut runner = JourneyRunner::with_config(runner_config);
    let summary = runtime.block_on(runner.run_all());

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Run the quick scenario set
fn simulate_run_quick(verbose: bool) -> Result<()> {
    let runner_config = JourneyRunnerConfig {
        verbose,
        ..Default::default()
    };

    let runtime = Runtime::new()?;
    let mut runner = JourneyRunner::with_config(runner_config);
    let summary = runtime.block_on(runner.run_quick());

    println!(
        "\n✓ Quick scenarios complete: {}/{} passed",
        summary.passed, summary.total
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Run scenarios filtered by tag
fn simulate_run_by_tag(tag: &str, verbose: bool) -> Result<()> {
    let runner_config = JourneyRunnerConfig {
        verbose,
        ..Default::default()
    };

    let runtime = Runtime::new()?;
    let mut runner = JourneyRunner::with_config(runner_config);
    let summary = runtime.block_on(runner.run_by_tag(tag));

    println!(
        "\n✓ Scenarios with tag '{}' complete: {}/{} passed",
        tag, summary.passed, summary.total
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Run specific scenarios by name
fn simulate_run_scenarios(names: &[String], verbose: bool) -> Result<()> {
    let selected: Vec<GalleryScenario> = ScenarioLibrary::all_scenarios()
        .into_iter()
        .filter(|s| names.iter().any(|n| n == &s.name))
        .collect();

    if selected.is_empty() {
        print_warning("No scenarios match the given names");
        print_info("Run 'camera-roll simulate list-scenarios' to see what is available");
        return Ok(());
    }

    let runner_config = JourneyRunnerConfig {
        verbose,
        ..Default::default()
    };

    let runtime = Runtime::new()?;
    let mut runner = JourneyRunner::with_config(runner_config);
    let summary = runtime.block_on(runner.run_scenarios(selected));

    println!(
        "\n✓ Selected scenarios complete: {}/{} passed",
        summary.passed, summary.total
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// List all available scenarios
fn simulate_list_scenarios(tag_filter: Option<&str>, detailed: bool) -> Result<()> {
    let scenarios = if let Some(tag) = tag_filter {
        ScenarioLibrary::scenarios_by_tag(tag)
    } else {
        ScenarioLibrary::all_scenarios()
    };

    if scenarios.is_empty() {
        if let Some(tag) = tag_filter {
            println!("No scenarios found with tag '{}'", tag);
        } else {
            println!("No scenarios available");
        }
        return Ok(());
    }

    print_header("AVAILABLE GALLERY SCENARIOS");

    if detailed {
        for scenario in &scenarios {
            println!("  {}", scenario.name);
            println!("    Description: {}", scenario.description);
            println!("    Tags: {}", scenario.tags.join(", "));
            println!("    Steps: {}", scenario.script.len());
            println!("    Expected photos: {}", scenario.expected.gallery_len);
            println!("    Should succeed: {}", scenario.expected.should_succeed);
            if let Some(ref err) = scenario.expected.expected_error {
                println!("    Expected error: {}", err);
            }
            println!();
        }
    } else {
        for scenario in &scenarios {
            let tags_str = if scenario.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", scenario.tags.join(", "))
            };
            println!(
                "  • {} - {}{}",
                scenario.name, scenario.description, tags_str
            );
        }
        println!();
    }

    println!("Total: {} scenarios", scenarios.len());
    Ok(())
}

/// List all available tags
fn simulate_list_tags() -> Result<()> {
    let tags = testkit::list_tags();

    println!("\nAvailable tags for filtering:\n");
    for tag in &tags {
        let count = ScenarioLibrary::scenarios_by_tag(tag).len();
        println!("  • {} ({} scenario(s))", tag, count);
    }
    println!();
    println!("Use: camera-roll simulate run-tag <TAG>");
    Ok(())
}

/// Show information about a specific scenario
fn simulate_scenario_info(name: &str) -> Result<()> {
    let scenarios = ScenarioLibrary::all_scenarios();
    let scenario = scenarios.iter().find(|s| s.name == name);

    match scenario {
        Some(s) => {
            print_header(&format!("SCENARIO: {}", s.name));
            println!("Description: {}", s.description);
            println!("Tags: {}", s.tags.join(", "));
            println!("\nFixtures:");
            println!("  Profile: {:?}", s.fixtures.profile);
            println!("  Seeded manifest: {}", s.fixtures.stored_manifest.is_some());
            println!("  Stored files: {}", s.fixtures.stored_files.len());
            println!("  Staged captures: {}", s.fixtures.staged_captures.len());
            if s.fixtures.deny_permission {
                println!("  Camera permission: denied");
            }
            if s.fixtures.fail_persist {
                println!("  Preference writes: failing");
            }
            if s.fixtures.fail_delete {
                println!("  File deletes: failing");
            }
            println!("\nScript:");
            for (i, step) in s.script.iter().enumerate() {
                println!("  {}. {:?}", i + 1, step);
            }
            println!("\nExpected outcome:");
            println!("  Photos in gallery: {}", s.expected.gallery_len);
            if let Some(len) = s.expected.persisted_len {
                println!("  Persisted entries: {}", len);
            }
            println!("  Manifest writes: {}", s.expected.persist_calls);
            println!("  File deletes: {}", s.expected.delete_calls);
            println!("  Should succeed: {}", s.expected.should_succeed);
            if let Some(ref err) = s.expected.expected_error {
                println!("  Expected error: {}", err);
            }
            println!();
        }
        None => {
            println!("Scenario '{}' not found.", name);
            println!("\nAvailable scenarios:");
            for s in &scenarios {
                println!("  • {}", s.name);
            }
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file_matches_known_extensions() {
        assert!(is_image_file(Path::new("photo.jpeg")));
        assert!(is_image_file(Path::new("photo.JPG")));
        assert!(is_image_file(Path::new("shot.png")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("noextension")));
    }

    #[test]
    fn test_collect_image_files_scans_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpeg"), b"a").unwrap();
        std::fs::write(dir.path().join("b.png"), b"b").unwrap();
        std::fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("c.jpg"), b"c").unwrap();

        let shallow = collect_image_files(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(shallow.len(), 2);

        let deep = collect_image_files(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_collect_image_files_takes_named_files_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("capture.raw");
        std::fs::write(&odd, b"raw").unwrap();

        let files = collect_image_files(&[odd.clone()], false).unwrap();
        assert_eq!(files, vec![odd]);
    }

    #[test]
    fn test_collect_image_files_rejects_missing_path() {
        let result = collect_image_files(&[PathBuf::from("/nonexistent/photo.jpeg")], false);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_photo_matches_filepath_and_bare_name() {
        let photos = vec![
            Photo::new("file:///data/167.jpeg"),
            Photo::new("file:///data/166.jpeg"),
        ];

        let by_path = find_photo(&photos, "file:///data/167.jpeg").unwrap();
        assert_eq!(by_path.filepath, "file:///data/167.jpeg");

        let by_name = find_photo(&photos, "166.jpeg").unwrap();
        assert_eq!(by_name.filepath, "file:///data/166.jpeg");

        assert!(find_photo(&photos, "999.jpeg").is_none());
    }
}
