//! Unified path management for docqa files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docqa/             # Config directory
//! ├── config.toml              # Client configuration
//! ├── session/                 # Persisted session record
//! │   ├── token                # Bearer token (0600 on Unix)
//! │   └── identity.json        # Logged-in identity
//! └── logs/                    # Application logs
//!     └── docqa.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "docqa";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find the user config directory")]
    ConfigDirNotFound,
}

/// Resolves docqa paths, optionally under an explicit base directory.
///
/// With no base the platform config directory is used (XDG on Linux).
/// A base directory replaces `~/.config/docqa` entirely, which is what tests
/// and the `--config-dir` flag rely on.
#[derive(Debug, Clone, Default)]
pub struct DocqaPaths {
    base: Option<PathBuf>,
}

impl DocqaPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the docqa configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/docqa/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding the two session records.
    pub fn session_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
