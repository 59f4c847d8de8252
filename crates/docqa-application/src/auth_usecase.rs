//! Login, registration and logout flows.

use docqa_core::error::Result;
use docqa_core::gateway::{ApiGateway, Credentials};
use docqa_core::route::Route;
use docqa_core::validation::{validate_email, validate_password};
use std::sync::Arc;

use crate::route_guard::landing_route;
use crate::session_store::SessionStore;

/// Validates input client-side, then talks to the gateway and the session
/// store. Invalid input never reaches the network.
pub struct AuthUseCase {
    gateway: Arc<dyn ApiGateway>,
    session: Arc<SessionStore>,
}

impl AuthUseCase {
    pub fn new(gateway: Arc<dyn ApiGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Logs in and returns the route the identity lands on.
    ///
    /// Backend errors (wrong password, unknown account) are returned as
    /// `DocqaError::Api` with the backend's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<Route> {
        let credentials = Self::credentials(email, password)?;
        let response = self.gateway.login(&credentials).await?;
        let landing = landing_route(&response.user);
        self.session.login(response.token, response.user)?;
        Ok(landing)
    }

    /// Creates an account. The user then logs in separately.
    pub async fn register(&self, email: &str, password: &str) -> Result<Route> {
        let credentials = Self::credentials(email, password)?;
        self.gateway.register(&credentials).await?;
        tracing::info!("[Auth] Registered {}", credentials.email);
        Ok(Route::Login)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn credentials(email: &str, password: &str) -> Result<Credentials> {
        let email = email.trim();
        validate_email(email)?;
        validate_password(password)?;
        Ok(Credentials::new(email, password))
    }
}
