//! Configuration file handling for homelist.
//!
//! The configuration file is stored at `$HOMELIST_HOME/config.json` and contains the backup
//! settings and the thresholds used when computing statistics.

use crate::backup::Backup;
use crate::slot::{FileSlots, Slots};
use crate::stats::{HIGH_AMOUNT_THRESHOLD, WARNING_DAYS};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "homelist";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const SLOTS: &str = "slots";
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$HOMELIST_HOME` and from there it loads `$HOMELIST_HOME/config.json`. It provides
/// paths to the directories that are expected in a certain location within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    slots: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its subdirectories and an initial `config.json` file with
    /// default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/homelist`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the homelist home directory")?;

        let root = utils::canonicalize(&maybe_relative).await?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;
        let slots = root.join(SLOTS);
        utils::make_dir(&slots).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            backups,
            slots,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the backups and slots directories exist
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The homelist home directory is missing, run 'homelist init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'homelist init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            slots: root.join(SLOTS),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        if !config.slots.is_dir() {
            bail!("The slots directory is missing '{}'", config.slots.display())
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn slots_dir(&self) -> &Path {
        &self.slots
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn high_amount_threshold(&self) -> u64 {
        self.config_file.high_amount_threshold
    }

    pub fn warning_days(&self) -> i64 {
        self.config_file.warning_days
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(&self.backups, self.backup_copies())
    }

    /// The file-backed storage slots in this home directory.
    pub fn slots(&self) -> Arc<dyn Slots> {
        Arc::new(FileSlots::new(&self.slots, self.backup()))
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "homelist",
///   "config_version": 1,
///   "backup_copies": 5,
///   "high_amount_threshold": 50000,
///   "warning_days": 3
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "homelist"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per slot
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Expenses of at least this many won count as high
    #[serde(default = "default_high_amount_threshold")]
    high_amount_threshold: u64,

    /// Food expiring within this many days is flagged
    #[serde(default = "default_warning_days")]
    warning_days: i64,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

fn default_high_amount_threshold() -> u64 {
    HIGH_AMOUNT_THRESHOLD
}

fn default_warning_days() -> i64 {
    WARNING_DAYS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            high_amount_threshold: HIGH_AMOUNT_THRESHOLD,
            warning_days: WARNING_DAYS,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.warning_days >= 0,
            "Invalid warning_days in config file: {} is negative",
            config.warning_days
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("homelist_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.slots_dir().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.backup_copies(), 5);
        assert_eq!(config.high_amount_threshold(), 50000);
        assert_eq!(config.warning_days(), 3);
    }

    #[tokio::test]
    async fn test_config_create_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("h");
        utils::make_dir(&home_dir).await.unwrap();
        let json = r#"{"app_name": "homelist", "config_version": 1, "warning_days": 5}"#;
        utils::write(home_dir.join(CONFIG_JSON), json).await.unwrap();

        let config = Config::create(&home_dir).await.unwrap();
        assert_eq!(config.warning_days(), 5);
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_slots_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        std::fs::remove_dir(config.slots_dir()).unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("slots directory is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "homelist");
        assert_eq!(config.backup_copies, 5);
        assert_eq!(config.high_amount_threshold, 50000);
        assert_eq!(config.warning_days, 3);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        utils::write(&config_path, r#"{"app_name": "homelist", "config_version": 1}"#)
            .await
            .unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        utils::write(&config_path, r#"{"app_name": "tiller", "config_version": 1}"#)
            .await
            .unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.json");
        let original = ConfigFile {
            backup_copies: 2,
            high_amount_threshold: 100_000,
            warning_days: 7,
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let read = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, read);
    }
}
