//! File-backed session records.

use docqa_core::auth::CredentialStore;
use docqa_core::error::{DocqaError, Result};
use std::path::Path;

use crate::paths::DocqaPaths;
use crate::storage::{AtomicFile, AtomicFileError};

const TOKEN_FILE: &str = "token";
const IDENTITY_FILE: &str = "identity.json";

/// Stores the token and the identity as two files in the session directory.
///
/// The token file is private to the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    token: AtomicFile,
    identity: AtomicFile,
}

impl FileCredentialStore {
    /// Creates a store rooted at `session_dir`. Nothing is touched on disk
    /// until the first write.
    pub fn new(session_dir: &Path) -> Self {
        Self {
            token: AtomicFile::new(session_dir.join(TOKEN_FILE)).private(),
            identity: AtomicFile::new(session_dir.join(IDENTITY_FILE)),
        }
    }

    /// Creates a store in the session directory of `paths`.
    pub fn from_paths(paths: &DocqaPaths) -> Result<Self> {
        let dir = paths
            .session_dir()
            .map_err(|e| DocqaError::config(e.to_string()))?;
        Ok(Self::new(&dir))
    }
}

fn storage_error(err: AtomicFileError) -> DocqaError {
    DocqaError::storage(err.to_string())
}

impl CredentialStore for FileCredentialStore {
    fn read_token(&self) -> Result<Option<String>> {
        let token = self.token.load().map_err(storage_error)?;
        Ok(token.map(|t| t.trim().to_string()))
    }

    fn read_identity(&self) -> Result<Option<String>> {
        self.identity.load().map_err(storage_error)
    }

    fn write_token(&self, token: &str) -> Result<()> {
        self.token.save(token).map_err(storage_error)
    }

    fn write_identity(&self, identity_json: &str) -> Result<()> {
        self.identity.save(identity_json).map_err(storage_error)
    }

    fn clear_token(&self) -> Result<()> {
        self.token.remove().map_err(storage_error)
    }

    fn clear_identity(&self) -> Result<()> {
        self.identity.remove().map_err(storage_error)
    }
}
