//! Bearer-token authorizer for Drive REST requests

use bridge_traits::{Clock, HttpRequest, SystemClock};
use core_auth::{AuthenticationError, Credential, StorageAuthorizer};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Holds the credential of the current sign-in and attaches it to requests.
///
/// The coordinator calls [`StorageAuthorizer::authorize`] after every
/// successful sign-in and [`StorageAuthorizer::revoke`] on sign-out.
pub struct DriveAuthorizer {
    credential: RwLock<Option<Credential>>,
    clock: Arc<dyn Clock>,
}

impl DriveAuthorizer {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Uses `clock` to decide whether the credential expired.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            credential: RwLock::new(None),
            clock,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Attaches `Authorization: Bearer` to `request`.
    ///
    /// # Errors
    ///
    /// - `NoSavedCredentials` if no sign-in has completed since the last revoke
    /// - `TokenExpired` if the credential is past its expiry
    pub fn authorize_request(
        &self,
        request: HttpRequest,
    ) -> Result<HttpRequest, AuthenticationError> {
        let guard = self
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(credential) = guard.as_ref() else {
            debug!("Request attempted before sign-in");
            return Err(AuthenticationError::NoSavedCredentials);
        };

        if credential.is_expired_at(self.clock.now()) {
            warn!(expires_at = ?credential.expires_at, "Credential expired");
            return Err(AuthenticationError::TokenExpired);
        }

        Ok(request.bearer_token(credential.access_token.as_str()))
    }
}

impl Default for DriveAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAuthorizer for DriveAuthorizer {
    fn authorize(&self, credential: Credential) {
        info!(expires_at = ?credential.expires_at, "Drive credential installed");
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }

    fn revoke(&self) {
        let previous = self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Drive credential revoked");
        }
    }
}

impl std::fmt::Debug for DriveAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveAuthorizer")
            .field("authorized", &self.is_authorized())
            .finish()
    }
}
