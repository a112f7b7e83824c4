//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A camera-roll photo gallery backed by local storage
#[derive(Parser, Debug)]
#[command(name = "camera-roll")]
#[command(version = "1.0.0")]
#[command(about = "Capture photos into a managed gallery, list them, and delete them", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory for gallery storage (overrides config)
    #[arg(short, long)]
    pub storage_root: Option<PathBuf>,

    /// JPEG quality requested from the camera, 0-100 (overrides config)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Preference key the photo manifest is stored under (overrides config)
    #[arg(long)]
    pub manifest_key: Option<String>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the photos saved in the gallery, newest first
    List {
        /// Number of grid columns to lay the photos out in
        #[arg(long, default_value = "2")]
        columns: usize,

        /// Show render sources and display paths for each photo
        #[arg(short, long)]
        verbose: bool,
    },

    /// Import local image files into the gallery as captures
    Import {
        /// Image files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Recurse into subdirectories when a directory is given
        #[arg(short, long)]
        recursive: bool,
    },

    /// Delete a photo from the gallery and from storage
    Delete {
        /// Filepath (or bare file name) of the photo, as shown by `list`
        filepath: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\camera_roll\config.toml
    /// - Linux/macOS: ~/.config/camera_roll/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,

    /// Run gallery scenarios against mock collaborators (no camera required)
    ///
    /// This command exercises the full capture/persist/delete pipeline
    /// using scripted cameras and in-memory storage, so every user journey
    /// can be checked without touching the real gallery.
    Simulate {
        #[command(subcommand)]
        simulate_command: SimulateCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SimulateCommands {
    /// Run all available gallery scenarios
    RunAll {
        /// Stop on first failure
        #[arg(long)]
        fail_fast: bool,
    },

    /// Run the quick scenario set only (fast)
    RunQuick {
        /// Verbose output showing detailed results
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run scenarios filtered by tag
    RunTag {
        /// Tag to filter scenarios by
        /// Available tags: load, capture, delete, sheet, direct, web, error, divergence, edge-case, basic, empty
        tag: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run specific scenarios by name
    Run {
        /// Scenario names to run (comma-separated or multiple values)
        #[arg(value_delimiter = ',')]
        scenarios: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all available scenarios
    ListScenarios {
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Show detailed information about each scenario
        #[arg(short, long)]
        detailed: bool,
    },

    /// List all available tags for filtering
    ListTags,

    /// Show information about a specific scenario
    Info {
        /// Name of the scenario to show info about
        name: String,
    },
}
