//! Core domain types for the docqa client.
//!
//! Holds the models shared by every layer, the error types, and the traits
//! that the infrastructure crate implements (`ApiGateway`,
//! `CredentialStore`, `AuthContext`). This crate performs no I/O.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod route;
pub mod validation;

pub use error::{ApiError, ApiResult, DocqaError, Result};
