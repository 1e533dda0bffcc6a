use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use acta_store::SyncMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// File name looked up inside the data directory when no explicit config
/// path is given.
pub const CONFIG_FILE_NAME: &str = "acta.toml";

/// Where Acta keeps its two stores and how it writes to them.
///
/// ```toml
/// data_dir = ".acta"
/// ledger_file = "ledger.jsonl"
/// votes_file = "votes.jsonl"
/// sync_on_append = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActaConfig {
    pub data_dir: PathBuf,
    /// Ledger file name, relative to `data_dir` unless absolute.
    pub ledger_file: PathBuf,
    /// Vote file name, relative to `data_dir` unless absolute.
    pub votes_file: PathBuf,
    /// `fsync` after every append.
    pub sync_on_append: bool,
}

impl Default for ActaConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".acta"),
            ledger_file: PathBuf::from("ledger.jsonl"),
            votes_file: PathBuf::from("votes.jsonl"),
            sync_on_append: false,
        }
    }
}

impl ActaConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(source: &str, origin: &Path) -> SdkResult<Self> {
        toml::from_str(source).map_err(|e| SdkError::InvalidConfig {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| SdkError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source, path)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `config_path` must exist. Without one, `acta.toml` inside
    /// the data directory is used when present, and defaults otherwise. A
    /// `data_dir_override` always wins over the file's `data_dir`.
    pub fn resolve(config_path: Option<&Path>, data_dir_override: Option<&Path>) -> SdkResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => {
                let data_dir = data_dir_override
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| Self::default().data_dir);
                let candidate = data_dir.join(CONFIG_FILE_NAME);
                match fs::read_to_string(&candidate) {
                    Ok(source) => Self::from_toml_str(&source, &candidate)?,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Self::with_data_dir(data_dir),
                    Err(source) => {
                        return Err(SdkError::ConfigIo {
                            path: candidate,
                            source,
                        })
                    }
                }
            }
        };
        if let Some(dir) = data_dir_override {
            config.data_dir = dir.to_path_buf();
        }
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::InvalidConfig {
            path: self.data_dir.join(CONFIG_FILE_NAME),
            reason: e.to_string(),
        })
    }

    /// Full path to the ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    /// Full path to the vote file.
    pub fn votes_path(&self) -> PathBuf {
        self.data_dir.join(&self.votes_file)
    }

    pub fn sync_mode(&self) -> SyncMode {
        if self.sync_on_append {
            SyncMode::EveryWrite
        } else {
            SyncMode::OsDefault
        }
    }
}
