//! Store paths loaded from environment variables.

use std::env;
use std::path::{Path, PathBuf};

use crate::game::Game;

const VENDOR_FOLDER: &str = "JSG-LLC";
const APP_FOLDER: &str = "MiHoYoTools";
const DEFAULT_DATABASE_FILE: &str = "mhytools.db";
const LEGACY_RECORDS_FOLDER: &str = "GachaRecords";

/// Subfolders created under the data root on every start.
const DATA_SUBFOLDERS: [&str; 4] = ["Logs", "Cache", "Exports", "Extras"];

/// Where the store and the legacy per-game folders live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Application data root holding the database and working folders.
    pub data_root: PathBuf,
    /// Vendor root holding the legacy per-game folders.
    pub legacy_root: PathBuf,
    /// Database file name inside `data_root`.
    pub database_file: String,
}

impl StoreConfig {
    /// Create a configuration rooted at explicit directories.
    pub fn new(data_root: impl Into<PathBuf>, legacy_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            legacy_root: legacy_root.into(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GACHA_DATA_DIR` | Application data root | `<Documents>/JSG-LLC/MiHoYoTools` |
    /// | `GACHA_LEGACY_DIR` | Legacy vendor root | `<Documents>/JSG-LLC` |
    /// | `GACHA_DB_FILE` | Database file name | `mhytools.db` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(None, None)
    }

    /// Like [`StoreConfig::from_env`], with explicit roots taking precedence.
    ///
    /// The Documents folder is only looked up for a root that neither an
    /// override nor the environment supplies.
    pub fn from_env_with(
        data_root: Option<PathBuf>,
        legacy_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let data_root = data_root.or_else(|| env::var_os("GACHA_DATA_DIR").map(PathBuf::from));
        let legacy_root =
            legacy_root.or_else(|| env::var_os("GACHA_LEGACY_DIR").map(PathBuf::from));
        let database_file =
            env::var("GACHA_DB_FILE").unwrap_or_else(|_| DEFAULT_DATABASE_FILE.to_string());

        resolve(data_root, legacy_root, database_file, vendor_root)
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_root.join(&self.database_file)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_root.join("Logs")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_root.join("Exports")
    }

    /// Folder the previous per-game releases wrote their record files to.
    pub fn legacy_records_dir(&self, game: Game) -> PathBuf {
        legacy_records_dir(&self.legacy_root, game)
    }

    /// Create the data root and its standard subfolders.
    pub fn ensure_folders(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_root)?;
        for folder in DATA_SUBFOLDERS {
            std::fs::create_dir_all(self.data_root.join(folder))?;
        }
        Ok(())
    }
}

/// `<legacy_root>/<legacy game folder>/GachaRecords`
pub fn legacy_records_dir(legacy_root: &Path, game: Game) -> PathBuf {
    legacy_root
        .join(game.legacy_folder_name())
        .join(LEGACY_RECORDS_FOLDER)
}

fn resolve(
    data_root: Option<PathBuf>,
    legacy_root: Option<PathBuf>,
    database_file: String,
    vendor_root: impl Fn() -> Result<PathBuf, ConfigError>,
) -> Result<StoreConfig, ConfigError> {
    if database_file.trim().is_empty() {
        return Err(ConfigError::EmptyDatabaseFile);
    }

    let data_root = match data_root {
        Some(dir) => dir,
        None => vendor_root()?.join(APP_FOLDER),
    };
    let legacy_root = match legacy_root {
        Some(dir) => dir,
        None => vendor_root()?,
    };

    Ok(StoreConfig {
        data_root,
        legacy_root,
        database_file,
    })
}

fn vendor_root() -> Result<PathBuf, ConfigError> {
    let dirs = directories::UserDirs::new().ok_or(ConfigError::NoDocumentsDir)?;
    let documents: &Path = dirs.document_dir().unwrap_or_else(|| dirs.home_dir());
    Ok(documents.join(VENDOR_FOLDER))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not resolve a documents or home directory")]
    NoDocumentsDir,

    #[error("GACHA_DB_FILE must not be empty")]
    EmptyDatabaseFile,
}
