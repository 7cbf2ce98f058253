use std::error::Error;
use std::sync::Arc;
use crate::config::Config;
use crate::identity::{self, IdentityProvider};
use crate::view::{HandlebarsRenderer, ViewRenderer};

/// Everything a request handler needs.
/// Created once at startup and shared by all requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    renderer: Arc<dyn ViewRenderer>,
    identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {

    pub fn new(config: Config) -> Result<Self, Box<dyn Error>> {
        let renderer = HandlebarsRenderer::new(config.views.templates_dir.as_deref())?;
        let identity_provider = identity::provider_from_config(&config.identity)?;
        Ok(Self::from_parts(config, Arc::new(renderer), Arc::from(identity_provider)))
    }

    /// Assemble an app state from its collaborators
    pub fn from_parts(config: Config,
                      renderer: Arc<dyn ViewRenderer>,
                      identity_provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
            identity_provider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &dyn ViewRenderer {
        self.renderer.as_ref()
    }

    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity_provider.as_ref()
    }
}
