//! Administrative read models.

mod model;

pub use model::{
    AdminDocument, AdminQuery, AdminStats, AdminUser, ToggleResult, UsageEntry,
};
