//! Service wiring shared by every command.

use anyhow::{Result, bail};
use docqa_application::{
    AdminService, AuthUseCase, ConversationController, DocumentRegistry, Navigation, Navigator,
    SessionStore,
};
use docqa_core::auth::AuthState;
use docqa_core::config::ClientConfig;
use docqa_core::gateway::ApiGateway;
use docqa_core::route::Route;
use docqa_infrastructure::{DocqaPaths, FileCredentialStore, HttpApiGateway};
use std::sync::Arc;

/// One instance of each service, driven by the command being run.
pub struct App {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub navigator: Navigator,
    pub registry: Arc<DocumentRegistry>,
    pub conversation: ConversationController,
    pub auth: AuthUseCase,
    pub admin: AdminService,
}

impl App {
    pub fn bootstrap(paths: &DocqaPaths, config: ClientConfig) -> Result<Self> {
        let storage = Arc::new(FileCredentialStore::from_paths(paths)?);
        let session = Arc::new(SessionStore::new(storage));

        match session.restore() {
            AuthState::Authenticated(s) => {
                tracing::info!("[Bootstrap] Session restored for {}", s.identity().email)
            }
            _ => tracing::info!("[Bootstrap] No stored session"),
        }

        let gateway: Arc<dyn ApiGateway> =
            Arc::new(HttpApiGateway::new(config.base_url(), session.clone()));
        tracing::info!("[Bootstrap] Backend at {}", config.base_url());

        let registry = Arc::new(DocumentRegistry::new(gateway.clone()));

        Ok(Self {
            navigator: Navigator::new(session.clone()),
            conversation: ConversationController::new(gateway.clone()),
            auth: AuthUseCase::new(gateway.clone(), session.clone()),
            admin: AdminService::new(gateway, registry.clone()),
            registry,
            session,
            config,
        })
    }

    /// Navigates to `route`, failing with the redirect reason when the
    /// session does not allow it.
    pub fn enter(&self, route: Route) -> Result<Route> {
        match self.navigator.navigate(route) {
            Navigation::Render(route) => Ok(route),
            Navigation::Redirect { from, to } => match self.session.identity() {
                Some(identity) => bail!(
                    "{} is not available to {} ({}); redirected to {}",
                    from,
                    identity.email,
                    identity.role,
                    to
                ),
                None => bail!("{} requires a session; run `docqa login` ({})", from, to),
            },
            Navigation::Pending => bail!("session is still loading"),
        }
    }

    /// Fails when a background 401 has demoted the current page.
    pub fn ensure_still_allowed(&self) -> Result<()> {
        match self.navigator.revalidate() {
            Some(Navigation::Redirect { to, .. }) => {
                bail!("session expired; please log in again ({})", to)
            }
            _ => Ok(()),
        }
    }
}
