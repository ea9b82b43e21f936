//! Google Drive service composition
//!
//! `DriveService` is what a sync framework holds on to: it owns the sign-in
//! coordinator, the authorizer the coordinator feeds, and hands out
//! authorized REST clients.

use core_auth::{
    AuthCoordinator, AuthOutcome, DeauthenticationError, DomainError, ErrorTranslator,
    IdentityProvider, PresentationContext,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::info;

use crate::authorizer::DriveAuthorizer;
use crate::client::DriveApiClient;
use crate::constants::{LOCALIZED_NAME, SERVICE_IDENTIFIER};

/// Google Drive storage service.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::DriveService;
///
/// let service = DriveService::new(&config, identity_provider, None);
/// let account = service.authenticate(context).await?;
/// let files = service.api_client()?.get_json::<FileList>(&url).await?;
/// ```
pub struct DriveService {
    config: CoreConfig,
    coordinator: AuthCoordinator,
    authorizer: Arc<DriveAuthorizer>,
}

impl DriveService {
    pub fn new(
        config: &CoreConfig,
        provider: Arc<dyn IdentityProvider>,
        event_bus: Option<EventBus>,
    ) -> Self {
        Self::with_authorizer(config, provider, Arc::new(DriveAuthorizer::new()), event_bus)
    }

    /// Creates a service that publishes auth events on a fresh bus sized by
    /// `config.event_buffer_size`. Subscribe through
    /// [`AuthCoordinator::event_bus`].
    pub fn with_events(config: &CoreConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self::new(
            config,
            provider,
            Some(EventBus::new(config.event_buffer_size)),
        )
    }

    /// Uses a caller-supplied authorizer, e.g. one with an injected clock.
    pub fn with_authorizer(
        config: &CoreConfig,
        provider: Arc<dyn IdentityProvider>,
        authorizer: Arc<DriveAuthorizer>,
        event_bus: Option<EventBus>,
    ) -> Self {
        let coordinator =
            AuthCoordinator::from_config(config, provider, authorizer.clone(), event_bus);
        info!(
            service = SERVICE_IDENTIFIER,
            client_id_configured = config.has_client_id(),
            "Drive service created"
        );

        Self {
            config: config.clone(),
            coordinator,
            authorizer,
        }
    }

    pub fn identifier(&self) -> &'static str {
        SERVICE_IDENTIFIER
    }

    pub fn localized_name(&self) -> &'static str {
        LOCALIZED_NAME
    }

    pub fn client_id(&self) -> Option<String> {
        self.coordinator.client_id()
    }

    pub fn set_client_id(&self, client_id: Option<String>) {
        self.coordinator.set_client_id(client_id);
    }

    pub fn coordinator(&self) -> &AuthCoordinator {
        &self.coordinator
    }

    pub fn authorizer(&self) -> &Arc<DriveAuthorizer> {
        &self.authorizer
    }

    pub async fn authenticate(&self, context: PresentationContext) -> AuthOutcome {
        self.coordinator.authenticate(context).await
    }

    pub fn authenticate_with<F>(&self, context: PresentationContext, on_complete: F)
    where
        F: FnOnce(AuthOutcome) + Send + 'static,
    {
        self.coordinator.authenticate_with(context, on_complete);
    }

    pub async fn authenticate_silently(&self) -> AuthOutcome {
        self.coordinator.authenticate_silently().await
    }

    pub fn authenticate_silently_with<F>(&self, on_complete: F)
    where
        F: FnOnce(AuthOutcome) + Send + 'static,
    {
        self.coordinator.authenticate_silently_with(on_complete);
    }

    pub async fn deauthenticate(&self) -> Result<(), DeauthenticationError> {
        self.coordinator.deauthenticate().await
    }

    pub fn deauthenticate_with<F>(&self, on_complete: F)
    where
        F: FnOnce(Result<(), DeauthenticationError>),
    {
        self.coordinator.deauthenticate_with(on_complete);
    }

    /// Normalizes the result of any Drive operation into the domain taxonomy.
    ///
    /// See [`ErrorTranslator::process`].
    pub fn process<T>(
        &self,
        result: Result<T, Box<dyn StdError + Send + Sync>>,
    ) -> Result<T, DomainError> {
        ErrorTranslator::process(result)
    }

    /// Returns a REST client authorized by the current sign-in.
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` when the configuration carries no `HttpClient`.
    pub fn api_client(&self) -> core_runtime::Result<DriveApiClient> {
        let http_client = self.config.require_http_client()?;
        Ok(DriveApiClient::new(http_client, self.authorizer.clone()))
    }
}

impl std::fmt::Debug for DriveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveService")
            .field("identifier", &SERVICE_IDENTIFIER)
            .field("coordinator", &self.coordinator)
            .field("authorizer", &self.authorizer)
            .finish()
    }
}
