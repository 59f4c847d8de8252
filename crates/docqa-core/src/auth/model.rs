//! Identity and session domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DocqaError, Result};

/// Role granted to an authenticated identity.
///
/// Closed set: a persisted or received role outside it makes the identity
/// malformed rather than silently mapping to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(alias = "_id", alias = "userId")]
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An authenticated identity together with its bearer credential.
///
/// Only constructible through [`Session::new`], so a `Session` value always
/// has a non-empty token and a complete identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Identity,
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>, identity: Identity) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DocqaError::validation("token", "credential token is empty"));
        }
        if identity.id.trim().is_empty() || identity.email.trim().is_empty() {
            return Err(DocqaError::validation(
                "identity",
                "identity must carry an id and an email",
            ));
        }
        Ok(Self { identity, token })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }
}

/// Observable state of the session store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Persisted records have not been read yet.
    #[default]
    Loading,
    /// No session.
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}
