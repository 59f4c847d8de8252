//! Atomic single-file writes.
//!
//! A record is either fully the old content or fully the new content on
//! disk: data goes to a sibling tmp file, is fsynced, then renamed over the
//! target.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

impl AtomicFileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A handle to one file written with tmp + fsync + rename.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
    private: bool,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
        }
    }

    /// Restricts the file to its owner (mode 0600 on Unix).
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: File exists and is not blank
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: The file exists but could not be read
    pub fn load(&self) -> Result<Option<String>, AtomicFileError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AtomicFileError::io(&self.path, e)),
        }
    }

    /// Replaces the file content atomically.
    pub fn save(&self, content: &str) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AtomicFileError::io(parent, e))?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = self
            .open_tmp(&tmp_path)
            .map_err(|e| AtomicFileError::io(&tmp_path, e))?;
        tmp_file
            .write_all(content.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| AtomicFileError::io(&tmp_path, e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            AtomicFileError::io(&self.path, e)
        })
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AtomicFileError::io(&self.path, e)),
        }
    }

    fn open_tmp(&self, tmp_path: &Path) -> std::io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // Set before any byte is written so the secret never exists world-readable.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if self.private {
                options.mode(0o600);
            }
        }

        let file = options.open(tmp_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if self.private {
                file.set_permissions(fs::Permissions::from_mode(0o600))?;
            }
        }

        Ok(file)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AtomicFileError::InvalidPath(self.path.clone()))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicFileError::InvalidPath(self.path.clone()))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}
