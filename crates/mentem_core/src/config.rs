//! Application paths and persistence constants.
//!
//! # Responsibility
//! - Name the on-disk layout (data directory, collection directories, file
//!   extension) and the legacy store keys in one place.
//! - Validate user-supplied roots before anything touches the disk.
//!
//! # Invariants
//! - `data_root` is always an absolute path.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory created under the data root that holds all collections.
pub const DATA_DIR_NAME: &str = "mentem";
/// Extension of record files, without the dot.
pub const RECORD_EXTENSION: &str = "md";
/// Legacy key-value entry holding persisted memories.
pub const LEGACY_MEMORIES_KEY: &str = "mentem-memories";
/// Legacy key-value entry holding persisted cards.
pub const LEGACY_CARDS_KEY: &str = "mentem-cards";
/// Legacy key-value entry holding persisted tags.
pub const LEGACY_TAGS_KEY: &str = "mentem-tags";
/// Flag key set once the legacy store has been replayed into files.
pub const MIGRATION_FLAG_KEY: &str = "mentem:migrated-to-fs";
/// Value stored under [`MIGRATION_FLAG_KEY`] after the migration attempt.
pub const MIGRATION_FLAG_DONE: &str = "1";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataRoot,
    RelativeDataRoot(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataRoot => write!(f, "data root cannot be empty"),
            Self::RelativeDataRoot(path) => {
                write!(f, "data root must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Process-level configuration for one library instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Parent directory of [`DATA_DIR_NAME`].
    pub data_root: PathBuf,
    /// SQLite file of the legacy key-value store, when one exists.
    pub legacy_db_path: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    /// Creates a config rooted at `data_root`.
    ///
    /// # Errors
    /// - `data_root` is empty or relative.
    pub fn new(data_root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data_root = data_root.as_ref();
        if data_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataRoot);
        }
        if !data_root.is_absolute() {
            return Err(ConfigError::RelativeDataRoot(data_root.to_path_buf()));
        }

        Ok(Self {
            data_root: data_root.to_path_buf(),
            legacy_db_path: None,
            log_level: default_log_level().to_string(),
        })
    }

    pub fn with_legacy_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_db_path = Some(path.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Directory holding the `memories/`, `cards/` and `tags/` collections.
    pub fn records_root(&self) -> PathBuf {
        self.data_root.join(DATA_DIR_NAME)
    }

    /// Default directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.records_root().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DATA_DIR_NAME};

    #[test]
    fn rejects_empty_and_relative_roots() {
        assert_eq!(AppConfig::new("").unwrap_err(), ConfigError::EmptyDataRoot);
        assert!(matches!(
            AppConfig::new("data/dev").unwrap_err(),
            ConfigError::RelativeDataRoot(_)
        ));
    }

    #[test]
    fn records_root_nests_data_dir() {
        let root = std::env::temp_dir();
        let config = AppConfig::new(&root)
            .unwrap()
            .with_log_level("warn")
            .with_legacy_db(root.join("legacy.sqlite3"));

        assert_eq!(config.records_root(), root.join(DATA_DIR_NAME));
        assert_eq!(config.log_level, "warn");
        assert!(config.legacy_db_path.is_some());
    }
}
