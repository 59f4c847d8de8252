pub mod config_service;
mod dto;
pub mod file_credential_store;
pub mod http_gateway;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_credential_store::FileCredentialStore;
pub use crate::http_gateway::HttpApiGateway;
pub use crate::paths::{DocqaPaths, PathError};
