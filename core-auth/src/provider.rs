//! Seams to the host identity SDK and the downstream storage client.

use crate::translator::ProviderError;
use crate::types::Credential;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Provider configuration for an interactive sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInConfig {
    pub client_id: String,
}

/// Profile fields of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// What the identity SDK hands back after a sign-in.
///
/// The SDK documents `profile` as always present on success, but it is typed
/// optional and the coordinator resolves its absence as an error.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub profile: Option<UserProfile>,
    pub credential: Credential,
}

/// Opaque handle to the UI the provider presents its sign-in flow from.
///
/// The coordinator never inspects it; only the `IdentityProvider` does.
#[derive(Clone, Default)]
pub struct PresentationContext(Option<Arc<dyn Any + Send + Sync>>);

impl PresentationContext {
    pub fn new<T: Any + Send + Sync>(handle: T) -> Self {
        Self(Some(Arc::new(handle)))
    }

    /// A context with no UI handle, for headless hosts and tests.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|handle| handle.downcast_ref::<T>())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for PresentationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PresentationContext")
            .field(&self.0.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Identity SDK bridge.
///
/// Each call resolves exactly once. `Ok(None)` means the SDK reported neither
/// a user nor an error.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Presents the interactive sign-in flow.
    async fn sign_in(
        &self,
        config: SignInConfig,
        context: PresentationContext,
        scopes: Vec<String>,
    ) -> Result<Option<ProviderUser>, ProviderError>;

    /// Restores the previous session without UI.
    async fn restore_previous_session(&self) -> Result<Option<ProviderUser>, ProviderError>;

    /// Forgets the local session. Never fails.
    fn sign_out(&self);
}

/// Receives credentials for the storage client that makes authorized calls.
pub trait StorageAuthorizer: Send + Sync {
    fn authorize(&self, credential: Credential);

    fn revoke(&self);
}
