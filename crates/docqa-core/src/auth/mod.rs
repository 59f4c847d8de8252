//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: `Role`, `Identity`, `Session`, `AuthState`
//! - `credential_store`: durable session record trait
//! - `context`: credential access used by the gateway

mod context;
mod credential_store;
mod model;

pub use context::{AuthContext, Unauthenticated};
pub use credential_store::CredentialStore;
pub use model::{AuthState, Identity, Role, Session};
