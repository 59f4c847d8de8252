//! Durable storage for the client-local session record.

use crate::error::Result;

/// Two independent durable records: the bearer token and the serialized
/// identity.
///
/// The records are deliberately separate so that a partial write is a
/// representable state; the session store is responsible for writing and
/// clearing them together and for treating a half-present pair as logged out.
///
/// Methods are synchronous: the session store must be able to clear state
/// without yielding.
pub trait CredentialStore: Send + Sync {
    /// Reads the persisted token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: A token record exists
    /// - `Ok(None)`: No token record
    /// - `Err(_)`: The record exists but could not be read
    fn read_token(&self) -> Result<Option<String>>;

    /// Reads the persisted identity record as raw JSON.
    fn read_identity(&self) -> Result<Option<String>>;

    fn write_token(&self, token: &str) -> Result<()>;

    fn write_identity(&self, identity_json: &str) -> Result<()>;

    /// Removes the token record. Succeeds when nothing is stored.
    fn clear_token(&self) -> Result<()>;

    /// Removes the identity record. Succeeds when nothing is stored.
    fn clear_identity(&self) -> Result<()>;
}
