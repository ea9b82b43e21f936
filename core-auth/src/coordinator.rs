//! # Authentication Coordinator
//!
//! Coalesces concurrent sign-in requests into a single provider attempt.
//!
//! ## Overview
//!
//! Any number of callers may ask to authenticate while a sign-in is already
//! on screen. The coordinator queues each caller's completion, runs exactly
//! one provider attempt, and delivers its outcome to every queued completion
//! once.
//!
//! ```text
//!  authenticate ─┐
//!  authenticate ─┼─> pending queue ──> one provider attempt ──> outcome
//!  silently ─────┘                                               │
//!        ^                       drain queue, return to Idle <───┘
//!        │                                   │
//!        └──── re-entrant call ── completions invoked
//! ```
//!
//! The queue is drained and the phase reset *before* any completion runs, so a
//! completion that calls `authenticate` again starts a fresh attempt instead of
//! joining the finished one.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::{AuthCoordinator, IdentityProvider, PresentationContext, StorageAuthorizer};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! # async fn run(
//! #     provider: Arc<dyn IdentityProvider>,
//! #     authorizer: Arc<dyn StorageAuthorizer>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = CoreConfig::builder()
//!     .client_id("1234-abc.apps.googleusercontent.com")
//!     .build()?;
//! let coordinator = AuthCoordinator::from_config(&config, provider, authorizer, None);
//!
//! let (first, second) = tokio::join!(
//!     coordinator.authenticate(PresentationContext::none()),
//!     coordinator.authenticate(PresentationContext::none()),
//! );
//! assert_eq!(first, second);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthenticationError, DeauthenticationError, ErrorCause};
use crate::provider::{
    IdentityProvider, PresentationContext, ProviderUser, SignInConfig, StorageAuthorizer,
};
use crate::translator::{ErrorTranslator, ProviderError};
use crate::types::{Account, AttemptId, SignInMode, SignInPhase};
use core_runtime::config::{CoreConfig, DRIVE_APP_DATA_SCOPE};
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use core_runtime::logging::mask_email;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

/// Result delivered to every caller of one sign-in attempt.
pub type AuthOutcome = Result<Account, AuthenticationError>;

type Completion = Box<dyn FnOnce(AuthOutcome) + Send + 'static>;

enum AttemptRequest {
    Interactive {
        config: SignInConfig,
        context: PresentationContext,
    },
    Silent,
}

impl AttemptRequest {
    fn mode(&self) -> SignInMode {
        match self {
            AttemptRequest::Interactive { .. } => SignInMode::Interactive,
            AttemptRequest::Silent => SignInMode::Silent,
        }
    }
}

#[derive(Default)]
struct CoordinatorState {
    client_id: Option<String>,
    pending: Vec<Completion>,
    phase: SignInPhase,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    authorizer: Arc<dyn StorageAuthorizer>,
    scopes: Vec<String>,
    event_bus: Option<EventBus>,
    // Runtime current at construction; lets host threads start attempts.
    runtime: Option<Handle>,
    // Never held across an await or while completions run.
    state: Mutex<CoordinatorState>,
}

/// Single-flight authentication front end for one storage provider.
///
/// Cloning is cheap; clones share the same queue and state.
///
/// The callback operations may be called from any thread. Attempts run on the
/// caller's Tokio runtime when there is one, otherwise on the runtime that was
/// current when the coordinator was built.
#[derive(Clone)]
pub struct AuthCoordinator {
    inner: Arc<Inner>,
}

impl AuthCoordinator {
    /// Creates a coordinator with no client ID, requesting the Drive app-data
    /// scope, and not publishing events.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        authorizer: Arc<dyn StorageAuthorizer>,
    ) -> Self {
        Self::from_parts(
            provider,
            authorizer,
            None,
            vec![DRIVE_APP_DATA_SCOPE.to_string()],
            None,
        )
    }

    /// Creates a coordinator from a validated configuration.
    pub fn from_config(
        config: &CoreConfig,
        provider: Arc<dyn IdentityProvider>,
        authorizer: Arc<dyn StorageAuthorizer>,
        event_bus: Option<EventBus>,
    ) -> Self {
        Self::from_parts(
            provider,
            authorizer,
            config.client_id.clone(),
            config.scopes.clone(),
            event_bus,
        )
    }

    fn from_parts(
        provider: Arc<dyn IdentityProvider>,
        authorizer: Arc<dyn StorageAuthorizer>,
        client_id: Option<String>,
        scopes: Vec<String>,
        event_bus: Option<EventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                authorizer,
                scopes,
                event_bus,
                runtime: Handle::try_current().ok(),
                state: Mutex::new(CoordinatorState {
                    client_id,
                    ..CoordinatorState::default()
                }),
            }),
        }
    }

    /// Replaces the client ID used by subsequent interactive sign-ins.
    ///
    /// A blank ID is treated as unset.
    pub fn set_client_id(&self, client_id: Option<String>) {
        let client_id = client_id.filter(|id| !id.trim().is_empty());
        debug!(configured = client_id.is_some(), "Updating client ID");
        self.lock_state().client_id = client_id;
    }

    pub fn client_id(&self) -> Option<String> {
        self.lock_state().client_id.clone()
    }

    pub fn phase(&self) -> SignInPhase {
        self.lock_state().phase
    }

    /// Number of completions waiting on the in-flight attempt.
    pub fn pending_count(&self) -> usize {
        self.lock_state().pending.len()
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.inner.event_bus.as_ref()
    }

    /// Requests interactive authentication, resolving `on_complete` once.
    ///
    /// Without a client ID, `on_complete` runs immediately with
    /// `InvalidClientId` and the provider is not contacted. Otherwise the
    /// completion is queued; a provider attempt starts only if none is in
    /// flight.
    #[instrument(skip(self, context, on_complete))]
    pub fn authenticate_with<F>(&self, context: PresentationContext, on_complete: F)
    where
        F: FnOnce(AuthOutcome) + Send + 'static,
    {
        let start = {
            let mut state = self.lock_state();
            let Some(client_id) = state.client_id.clone() else {
                drop(state);
                warn!("Authentication requested without a client ID");
                self.emit(AuthEvent::AuthError {
                    message: AuthenticationError::InvalidClientId.to_string(),
                    recoverable: false,
                });
                on_complete(Err(AuthenticationError::InvalidClientId));
                return;
            };

            state.pending.push(Box::new(on_complete));
            if state.phase.is_in_progress() {
                debug!(
                    pending = state.pending.len(),
                    "Sign-in already in flight, request queued"
                );
                None
            } else {
                state.phase = SignInPhase::SigningIn(SignInMode::Interactive);
                Some(AttemptRequest::Interactive {
                    config: SignInConfig { client_id },
                    context,
                })
            }
        };

        if let Some(request) = start {
            self.spawn_attempt(request);
        }
    }

    /// Requests interactive authentication and waits for the shared outcome.
    pub async fn authenticate(&self, context: PresentationContext) -> AuthOutcome {
        let (tx, rx) = oneshot::channel();
        self.authenticate_with(context, move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or_else(|_| Err(AuthenticationError::unknown()))
    }

    /// Requests a silent session restore, resolving `on_complete` once.
    ///
    /// Coalesces with any attempt in flight, interactive or silent. Restoring
    /// a session does not need a client ID.
    #[instrument(skip(self, on_complete))]
    pub fn authenticate_silently_with<F>(&self, on_complete: F)
    where
        F: FnOnce(AuthOutcome) + Send + 'static,
    {
        let start = {
            let mut state = self.lock_state();
            state.pending.push(Box::new(on_complete));
            if state.phase.is_in_progress() {
                debug!(
                    pending = state.pending.len(),
                    "Sign-in already in flight, restore request queued"
                );
                false
            } else {
                state.phase = SignInPhase::SigningIn(SignInMode::Silent);
                true
            }
        };

        if start {
            self.spawn_attempt(AttemptRequest::Silent);
        }
    }

    /// Requests a silent session restore and waits for the shared outcome.
    pub async fn authenticate_silently(&self) -> AuthOutcome {
        let (tx, rx) = oneshot::channel();
        self.authenticate_silently_with(move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or_else(|_| Err(AuthenticationError::unknown()))
    }

    /// Signs out of the provider locally and revokes the storage credential.
    ///
    /// Always succeeds. An attempt already in flight is not cancelled.
    #[instrument(skip(self, on_complete))]
    pub fn deauthenticate_with<F>(&self, on_complete: F)
    where
        F: FnOnce(Result<(), DeauthenticationError>),
    {
        self.inner.provider.sign_out();
        self.inner.authorizer.revoke();
        info!("Signed out");
        self.emit(AuthEvent::SignedOut);
        on_complete(Ok(()));
    }

    pub async fn deauthenticate(&self) -> Result<(), DeauthenticationError> {
        let mut result = Ok(());
        self.deauthenticate_with(|outcome| result = outcome);
        result
    }

    fn spawn_attempt(&self, request: AttemptRequest) {
        let attempt_id = AttemptId::new();
        let mode = request.mode();
        let span = info_span!("sign_in_attempt", attempt_id = %attempt_id, mode = ?mode);

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => match self.inner.runtime.clone() {
                Some(handle) => handle,
                None => {
                    let _entered = span.enter();
                    let cause = core_runtime::Error::RuntimeUnavailable(format!(
                        "coordinator was built and called outside a Tokio runtime: {}",
                        e
                    ));
                    self.finish_attempt(Err(AuthenticationError::Other(ErrorCause::new(cause))));
                    return;
                }
            },
        };

        info!(parent: &span, "Starting sign-in attempt");
        self.emit(AuthEvent::SigningIn {
            interactive: mode.is_interactive(),
        });

        let coordinator = self.clone();
        handle.spawn(
            async move {
                let provider = Arc::clone(&coordinator.inner.provider);
                let scopes = coordinator.inner.scopes.clone();
                let call = tokio::spawn(async move {
                    match request {
                        AttemptRequest::Interactive { config, context } => {
                            provider.sign_in(config, context, scopes).await
                        }
                        AttemptRequest::Silent => provider.restore_previous_session().await,
                    }
                });

                let outcome = match call.await {
                    Ok(result) => coordinator.on_provider_result(result),
                    Err(e) => {
                        warn!(error = %e, "Identity provider task did not complete");
                        let cause = core_runtime::Error::Internal(format!(
                            "identity provider task failed: {}",
                            e
                        ));
                        Err(AuthenticationError::Other(ErrorCause::new(cause)))
                    }
                };
                coordinator.finish_attempt(outcome);
            }
            .instrument(span),
        );
    }

    /// Turns the provider's answer into an outcome, authorizing the storage
    /// client on success.
    fn on_provider_result(
        &self,
        result: Result<Option<ProviderUser>, ProviderError>,
    ) -> AuthOutcome {
        let user = match result {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Identity provider returned neither a user nor an error");
                return Err(AuthenticationError::unknown());
            }
            Err(e) => {
                debug!(error = %e, "Identity provider reported an error");
                return Err(ErrorTranslator::translate_authentication(&e));
            }
        };

        let Some(profile) = user.profile else {
            warn!("Signed-in user has no profile");
            return Err(AuthenticationError::unknown());
        };

        self.inner.authorizer.authorize(user.credential);
        Ok(Account::new(profile.name, profile.email))
    }

    fn finish_attempt(&self, outcome: AuthOutcome) {
        let pending = {
            let mut state = self.lock_state();
            state.phase = SignInPhase::Idle;
            std::mem::take(&mut state.pending)
        };

        match &outcome {
            Ok(account) => {
                info!(
                    waiters = pending.len(),
                    email = %mask_email(&account.email),
                    "Sign-in succeeded"
                );
                self.emit(AuthEvent::SignedIn {
                    display_name: account.display_name.clone(),
                    email: mask_email(&account.email),
                });
            }
            Err(e) => {
                if matches!(e, AuthenticationError::Cancelled) {
                    info!(waiters = pending.len(), "Sign-in cancelled");
                } else {
                    warn!(waiters = pending.len(), error = %e, "Sign-in failed");
                }
                self.emit(AuthEvent::AuthError {
                    message: e.to_string(),
                    recoverable: e.is_recoverable(),
                });
            }
        }

        for completion in pending {
            let outcome = outcome.clone();
            if panic::catch_unwind(AssertUnwindSafe(move || completion(outcome))).is_err() {
                warn!("Sign-in completion panicked; delivering to remaining waiters");
            }
        }
    }

    fn emit(&self, event: AuthEvent) {
        if let Some(bus) = &self.inner.event_bus {
            let _ = bus.emit(CoreEvent::Auth(event));
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for AuthCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("AuthCoordinator")
            .field("client_id_configured", &state.client_id.is_some())
            .field("phase", &state.phase)
            .field("pending", &state.pending.len())
            .field("scopes", &self.inner.scopes)
            .finish()
    }
}
