//! Role-gated navigation.

use docqa_core::auth::{AuthState, Identity, Role};
use docqa_core::route::{Access, AdminPage, Route};
use std::sync::{Arc, Mutex};

use crate::lock;
use crate::session_store::SessionStore;

/// Result of checking a route against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being restored; render nothing yet.
    Loading,
    /// Redirect to the public entry point.
    Denied,
    Allowed,
}

/// Stateless access check.
pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(state: &AuthState, access: Access) -> GuardDecision {
        match (state, access) {
            (AuthState::Loading, _) => GuardDecision::Loading,
            (_, Access::Public) => GuardDecision::Allowed,
            (AuthState::Anonymous, _) => GuardDecision::Denied,
            (AuthState::Authenticated(_), Access::Authenticated) => GuardDecision::Allowed,
            (AuthState::Authenticated(session), Access::Role(required)) => {
                if session.role() == required {
                    GuardDecision::Allowed
                } else {
                    GuardDecision::Denied
                }
            }
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Pending,
    Render(Route),
    Redirect { from: Route, to: Route },
}

/// Where a freshly logged-in identity lands.
pub fn landing_route(identity: &Identity) -> Route {
    match identity.role {
        Role::Admin => Route::Admin(AdminPage::Overview),
        Role::User => Route::Dashboard,
    }
}

/// Tracks the current route and enforces the guard on every move.
pub struct Navigator {
    session: Arc<SessionStore>,
    current: Mutex<Option<Route>>,
}

impl Navigator {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            current: Mutex::new(None),
        }
    }

    pub fn navigate(&self, route: Route) -> Navigation {
        let state = self.session.state();
        match RouteGuard::evaluate(&state, route.access()) {
            GuardDecision::Loading => Navigation::Pending,
            GuardDecision::Denied => {
                tracing::debug!("[Navigator] {} denied, redirecting to {}", route, Route::Login);
                *lock(&self.current) = Some(Route::Login);
                Navigation::Redirect {
                    from: route,
                    to: Route::Login,
                }
            }
            GuardDecision::Allowed => {
                *lock(&self.current) = Some(route.clone());
                Navigation::Render(route)
            }
        }
    }

    /// Re-checks the current route against the latest session state.
    ///
    /// Returns `None` when nothing has been navigated to yet.
    pub fn revalidate(&self) -> Option<Navigation> {
        let current = lock(&self.current).clone()?;
        Some(self.navigate(current))
    }

    pub fn current(&self) -> Option<Route> {
        lock(&self.current).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryCredentialStore, admin, user};
    use docqa_core::auth::Session;

    fn authenticated(identity: Identity) -> AuthState {
        AuthState::Authenticated(Session::new("jwt", identity).unwrap())
    }

    fn admin_route() -> Route {
        Route::Admin(AdminPage::Overview)
    }

    #[test]
    fn test_loading_renders_nothing() {
        for access in [Access::Public, Access::Authenticated, Access::Role(Role::Admin)] {
            assert_eq!(
                RouteGuard::evaluate(&AuthState::Loading, access),
                GuardDecision::Loading
            );
        }
    }

    #[test]
    fn test_anonymous_is_denied_protected_routes() {
        let state = AuthState::Anonymous;
        assert_eq!(
            RouteGuard::evaluate(&state, Access::Public),
            GuardDecision::Allowed
        );
        assert_eq!(
            RouteGuard::evaluate(&state, Access::Authenticated),
            GuardDecision::Denied
        );
    }

    #[test]
    fn test_role_gating() {
        let access = admin_route().access();
        assert_eq!(
            RouteGuard::evaluate(&authenticated(user()), access),
            GuardDecision::Denied
        );
        assert_eq!(
            RouteGuard::evaluate(&authenticated(admin()), access),
            GuardDecision::Allowed
        );
    }

    #[test]
    fn test_admin_may_open_user_routes() {
        assert_eq!(
            RouteGuard::evaluate(&authenticated(admin()), Route::Dashboard.access()),
            GuardDecision::Allowed
        );
    }

    #[test]
    fn test_landing_route_by_role() {
        assert_eq!(landing_route(&user()), Route::Dashboard);
        assert_eq!(landing_route(&admin()), admin_route());
    }

    #[test]
    fn test_navigator_pending_until_restored() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryCredentialStore::default())));
        let navigator = Navigator::new(session.clone());

        assert_eq!(navigator.navigate(Route::Dashboard), Navigation::Pending);
        assert_eq!(navigator.current(), None);

        session.restore();
        assert_eq!(
            navigator.navigate(Route::Dashboard),
            Navigation::Redirect {
                from: Route::Dashboard,
                to: Route::Login
            }
        );
        assert_eq!(navigator.current(), Some(Route::Login));
    }

    #[test]
    fn test_user_redirected_from_admin() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryCredentialStore::default())));
        session.login("jwt", user()).unwrap();
        let navigator = Navigator::new(session);

        assert!(matches!(
            navigator.navigate(admin_route()),
            Navigation::Redirect { .. }
        ));
    }

    #[test]
    fn test_logout_demotes_rendered_page() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryCredentialStore::default())));
        session.login("jwt", user()).unwrap();
        let navigator = Navigator::new(session.clone());

        let chat = Route::Chat {
            document_id: "d1".to_string(),
        };
        assert_eq!(navigator.navigate(chat.clone()), Navigation::Render(chat.clone()));

        session.logout();
        assert_eq!(
            navigator.revalidate(),
            Some(Navigation::Redirect {
                from: chat,
                to: Route::Login
            })
        );
    }
}
