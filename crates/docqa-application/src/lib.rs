//! Application services for the docqa client.
//!
//! Every front-end drives the same instances of these services:
//!
//! - [`SessionStore`]: who is logged in, persisted and observable
//! - [`Navigator`] / [`RouteGuard`]: role-gated navigation
//! - [`DocumentRegistry`]: cached document list
//! - [`ConversationController`]: per-document question/answer flow
//! - [`AuthUseCase`] / [`AdminService`]: thin orchestration over the gateway

pub mod admin_service;
pub mod auth_usecase;
pub mod conversation_controller;
pub mod document_registry;
pub mod route_guard;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin_service::AdminService;
pub use auth_usecase::AuthUseCase;
pub use conversation_controller::{
    ConversationController, HistoryLoad, HistoryOutcome, PendingAnswer, SendOutcome,
};
pub use document_registry::DocumentRegistry;
pub use route_guard::{GuardDecision, Navigation, Navigator, RouteGuard, landing_route};
pub use session_store::SessionStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Critical sections in this crate never leave state half-updated, so a
/// poisoned lock still guards consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
