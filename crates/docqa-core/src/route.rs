//! Navigational routes and their access requirements.

use std::fmt;

use crate::auth::Role;

/// Pages of the admin area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AdminPage {
    Overview,
    Users,
    UserDetail { user_id: String },
    Documents,
    Queries,
    Usage,
}

/// A location in the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Chat { document_id: String },
    Admin(AdminPage),
}

/// What a route requires from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

impl Route {
    /// Parses a path such as `/chat/abc` or `/admin/users/42`.
    ///
    /// Trailing slashes are ignored. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["dashboard"] => Route::Dashboard,
            ["chat", id] => Route::Chat {
                document_id: (*id).to_string(),
            },
            ["admin"] => Route::Admin(AdminPage::Overview),
            ["admin", "users"] => Route::Admin(AdminPage::Users),
            ["admin", "users", id] => Route::Admin(AdminPage::UserDetail {
                user_id: (*id).to_string(),
            }),
            ["admin", "documents"] => Route::Admin(AdminPage::Documents),
            ["admin", "queries"] => Route::Admin(AdminPage::Queries),
            ["admin", "usage"] => Route::Admin(AdminPage::Usage),
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Chat { document_id } => format!("/chat/{}", document_id),
            Route::Admin(page) => match page {
                AdminPage::Overview => "/admin".to_string(),
                AdminPage::Users => "/admin/users".to_string(),
                AdminPage::UserDetail { user_id } => format!("/admin/users/{}", user_id),
                AdminPage::Documents => "/admin/documents".to_string(),
                AdminPage::Queries => "/admin/queries".to_string(),
                AdminPage::Usage => "/admin/usage".to_string(),
            },
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Signup => Access::Public,
            Route::Dashboard | Route::Chat { .. } => Access::Authenticated,
            Route::Admin(_) => Access::Role(Role::Admin),
        }
    }

    pub fn is_public(&self) -> bool {
        self.access() == Access::Public
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
