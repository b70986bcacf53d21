//! Startup configuration and on-disk layout. Settings are read once from a
//! TOML file inside the application data directory; a missing file falls
//! back to defaults so a fresh install works without any setup. The resolved
//! directories live in [`Workspace`] and get passed explicitly to the layers
//! that need them instead of living in module-level state.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".table-exporter";
/// Configuration file name stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level settings parsed from the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// `[database]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// File name of the demo database seeded on startup.
    pub demo_file: String,
    /// Override for the directory holding imported database files.
    pub databases_dir: Option<PathBuf>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            demo_file: "example.db".to_string(),
            databases_dir: None,
        }
    }
}

/// `[export]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Override for the directory CSV files are written to.
    pub dir: Option<PathBuf>,
}

/// `[logging]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file name inside the logs directory.
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: "table-exporter.log".to_string(),
        }
    }
}

/// Resolve the application data directory inside the user's home.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| AppError::Config("could not locate home directory".to_string()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Path of the configuration file inside a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Read settings from `path`. A missing file yields defaults; an unreadable
/// or malformed file is an error so typos do not silently vanish.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|err| AppError::Config(format!("failed to parse {}: {err}", path.display())))
}

/// Fixed on-disk locations used by the running application. Every directory
/// is created up front so later file operations only fail for interesting
/// reasons.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root application data directory.
    pub data_dir: PathBuf,
    /// Working directory imported database files are copied into.
    pub databases_dir: PathBuf,
    /// Directory exported CSV files are written to.
    pub export_dir: PathBuf,
    /// Directory holding the log file.
    pub log_dir: PathBuf,
    /// Log file name inside `log_dir`.
    pub log_file: String,
}

impl Workspace {
    /// Build a workspace rooted at an explicit directory. Split out from
    /// [`Workspace::resolve`] so tests can point the whole layout at a
    /// temporary directory.
    pub fn rooted_at(data_dir: PathBuf, settings: &Settings) -> Result<Self> {
        let databases_dir = settings
            .database
            .databases_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("databases"));
        let export_dir = settings
            .export
            .dir
            .clone()
            .unwrap_or_else(|| data_dir.join("exported"));
        let log_dir = data_dir.join("logs");

        for dir in [&data_dir, &databases_dir, &export_dir, &log_dir] {
            fs::create_dir_all(dir)?;
        }

        Ok(Self {
            data_dir,
            databases_dir,
            export_dir,
            log_dir,
            log_file: settings.logging.file.clone(),
        })
    }

    /// Build the workspace under the user's home directory.
    pub fn resolve(settings: &Settings) -> Result<Self> {
        Self::rooted_at(default_data_dir()?, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
[database]
demo_file = "sample.db"

[export]
dir = "/tmp/exports"

[logging]
file = "custom.log"
"#;

    #[test]
    fn parses_sample_config() {
        let settings: Settings = toml::from_str(SAMPLE_CONFIG).expect("sample config parses");
        assert_eq!(settings.database.demo_file, "sample.db");
        assert_eq!(settings.export.dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(settings.logging.file, "custom.log");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("[database]\n").expect("partial config parses");
        assert_eq!(settings.database.demo_file, "example.db");
        assert!(settings.export.dir.is_none());
        assert_eq!(settings.logging.file, "table-exporter.log");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&dir.path().join("config.toml")).expect("defaults");
        assert_eq!(settings.database.demo_file, "example.db");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database\nnot toml").expect("write config");

        let err = load_settings(&path).expect_err("malformed config");
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn workspace_creates_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::rooted_at(dir.path().join("data"), &Settings::default())
            .expect("workspace");

        assert!(workspace.databases_dir.is_dir());
        assert!(workspace.export_dir.is_dir());
        assert!(workspace.log_dir.is_dir());
        assert!(workspace.databases_dir.ends_with("databases"));
        assert!(workspace.export_dir.ends_with("exported"));
    }
}
