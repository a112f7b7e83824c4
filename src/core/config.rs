//! Configuration module for the camera roll gallery
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\camera_roll\config.toml
//! - Linux/macOS: ~/.config/camera_roll/config.toml

use crate::platform::traits::CameraSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config and data directories
const APP_NAME: &str = "camera_roll";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the standard configuration directory for the application.
///
/// Returns:
/// - Windows: %APPDATA%\camera_roll
/// - Linux/macOS: ~/.config/camera_roll
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Get the standard configuration file path.
///
/// Returns the full path to the config file in the standard location.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
///
/// Creates the directory and all parent directories if they don't exist.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Creates the config directory and copies the default config template.
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        let default_config = Config::generate_default_config();
        fs::write(&config_path, default_config)
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Open the configuration file in the default application.
///
/// This will typically open the file in Notepad on Windows,
/// or the default text editor on other platforms.
pub fn open_config_in_editor() -> Result<PathBuf, ConfigError> {
    // Ensure config exists first
    let config_path = init_config()?;

    // Open with default application
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", config_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,

    /// Capture settings
    pub capture: CaptureConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Gallery storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for gallery storage; each storage area (data, cache,
    /// documents) is a subdirectory. Empty = per-user data directory.
    pub root: PathBuf,

    /// Preference key the photo manifest is stored under
    pub manifest_key: String,

    /// File name of the JSON preference store inside the storage root
    pub preferences_file: String,
}

/// Photo capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// JPEG quality requested from the camera (0-100)
    pub quality: u8,

    /// Extension appended to timestamp-based file names
    pub file_extension: String,

    /// Capture source: camera, photos, or prompt
    pub source: CameraSource,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(), // Empty = per-user data directory
            manifest_key: "photos".to_string(),
            preferences_file: "preferences.json".to_string(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            quality: 100,
            file_extension: ".jpeg".to_string(),
            source: CameraSource::Camera,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./camera_roll.log"),
        }
    }
}

impl StorageConfig {
    /// Get the effective storage root
    ///
    /// Returns the configured root, or the per-user data directory
    /// (`~/.local/share/camera_roll/gallery` and friends) when empty.
    pub fn effective_root(&self) -> PathBuf {
        if self.root.as_os_str().is_empty() {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_NAME)
                .join("gallery")
        } else {
            self.root.clone()
        }
    }

    /// Full path of the JSON preference store file
    pub fn preferences_path(&self) -> PathBuf {
        self.effective_root().join(&self.preferences_file)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml (current directory - for development/override)
    /// 2. ./camera_roll.toml (current directory - alternative name)
    /// 3. Standard config location (%APPDATA%\camera_roll\config.toml on Windows)
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        // First check local directory (allows for project-specific overrides)
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./camera_roll.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return Self::load(path);
            }
        }

        // Then check standard config location
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    ///
    /// Returns the first existing config file path, or the standard location if none exists.
    pub fn get_active_config_path() -> PathBuf {
        let local_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("./camera_roll.toml"),
        ];

        for path in &local_paths {
            if path.exists() {
                return path.clone();
            }
        }

        // Return standard location
        get_config_path().unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    /// This uses the example config file to ensure it stays up to date
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// Failed to open config file in editor
    OpenError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::OpenError(path, err) => {
                write!(
                    f,
                    "Failed to open config file '{}': {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.manifest_key, "photos");
        assert_eq!(config.storage.preferences_file, "preferences.json");
        assert!(config.storage.root.as_os_str().is_empty());
        assert_eq!(config.capture.quality, 100);
        assert_eq!(config.capture.file_extension, ".jpeg");
        assert_eq!(config.capture.source, CameraSource::Camera);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.log_to_file);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [capture]
            quality = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.quality, 80);
        assert_eq!(config.capture.file_extension, ".jpeg");
        assert_eq!(config.storage.manifest_key, "photos");
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            root = "/tmp/gallery"
            manifest_key = "album"
            preferences_file = "prefs.json"

            [capture]
            quality = 90
            file_extension = ".jpg"
            source = "photos"

            [logging]
            level = "debug"
            log_to_file = true
            log_file = "/tmp/gallery.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.root, PathBuf::from("/tmp/gallery"));
        assert_eq!(config.storage.manifest_key, "album");
        assert_eq!(config.capture.source, CameraSource::Photos);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.log_to_file);
    }

    #[test]
    fn test_effective_root_prefers_configured_path() {
        let storage = StorageConfig {
            root: PathBuf::from("/tmp/custom"),
            ..Default::default()
        };
        assert_eq!(storage.effective_root(), PathBuf::from("/tmp/custom"));
        assert_eq!(
            storage.preferences_path(),
            PathBuf::from("/tmp/custom/preferences.json")
        );
    }

    #[test]
    fn test_effective_root_falls_back_to_data_dir() {
        let storage = StorageConfig::default();
        let root = storage.effective_root();
        assert!(root.ends_with(Path::new("camera_roll/gallery")));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.capture.quality = 75;
        config.storage.manifest_key = "vacation".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.capture.quality, 75);
        assert_eq!(reloaded.storage.manifest_key, "vacation");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = Config::load("/nonexistent/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let raw = Config::generate_default_config();
        let config: Config = toml::from_str(&raw).unwrap();
        assert_eq!(config.storage.manifest_key, "photos");
        assert_eq!(config.capture.quality, 100);
    }
}
