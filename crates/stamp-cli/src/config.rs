//! Watch configuration.
//!
//! Read from `.stamp/config.json` (or any file given with `--config`).
//! Every field is optional; command-line flags win over the file.

use serde::{Deserialize, Serialize};
use stamp_watcher::WatchFlags;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory holding Stamp's per-project files.
pub const CONFIG_DIR: &str = ".stamp";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// How often to stat the file, in milliseconds.
    pub poll_interval_ms: u64,

    /// Keep watching through stat failures.
    pub ignore_errors: bool,

    /// Don't report changes while the file is empty.
    pub ignore_change_if_empty: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            ignore_errors: false,
            ignore_change_if_empty: false,
        }
    }
}

impl WatchConfig {
    /// Loads a config file. Unlike [`WatchConfig::discover`], a missing
    /// file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `<root>/.stamp/config.json` if there is one, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::default_path(root);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn flags(&self) -> WatchFlags {
        let mut flags = WatchFlags::empty();
        flags.set(WatchFlags::IGNORE_ERRORS, self.ignore_errors);
        flags.set(WatchFlags::IGNORE_CHANGE_IF_EMPTY, self.ignore_change_if_empty);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = WatchConfig::discover(dir.path()).unwrap();
        assert_eq!(config, WatchConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert!(config.flags().is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = WatchConfig::default_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "ignore_errors": true }"#).unwrap();

        let config = WatchConfig::discover(dir.path()).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.flags(), WatchFlags::IGNORE_ERRORS);
    }

    #[test]
    fn test_load_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("watch.json");
        fs::write(
            &path,
            r#"{ "poll_interval_ms": 40, "ignore_errors": false, "ignore_change_if_empty": true }"#,
        )
        .unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(40));
        assert_eq!(config.flags(), WatchFlags::IGNORE_CHANGE_IF_EMPTY);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            WatchConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            WatchConfig::load(&broken),
            Err(ConfigError::Parse { .. })
        ));

        let zero = dir.path().join("zero.json");
        fs::write(&zero, r#"{ "poll_interval_ms": 0 }"#).unwrap();
        assert!(matches!(
            WatchConfig::load(&zero),
            Err(ConfigError::ZeroInterval)
        ));
    }
}
