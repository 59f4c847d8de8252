//! The gateway's view of the current session.

/// Read-mostly access to the current credential.
///
/// The gateway calls [`AuthContext::bearer_token`] at request time rather
/// than capturing a token when it is constructed, so a logout takes effect
/// for every later request.
pub trait AuthContext: Send + Sync {
    /// The token to attach to the next request, if a session is active.
    fn bearer_token(&self) -> Option<String>;

    /// Invoked when the backend rejected the attached credential.
    /// Implementations purge the session.
    fn expire(&self);
}

/// An `AuthContext` that never has a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unauthenticated;

impl AuthContext for Unauthenticated {
    fn bearer_token(&self) -> Option<String> {
        None
    }

    fn expire(&self) {}
}
