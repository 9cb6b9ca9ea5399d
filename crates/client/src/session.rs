//! Session state: who is logged in, and the operations that change it.

use std::sync::Arc;

use parking_lot::RwLock;
use quizdesk_core::{IdentityRecord, Role, SessionIdentity};
use reqwest::StatusCode;
use serde_json::json;

use crate::endpoints;
use crate::error::ApiError;
use crate::http::ApiRequest;
use crate::store::{self, IdentityStore};
use crate::transport::ApiClient;

/// Process-wide identity, seeded from the persisted store.
///
/// Readers never touch the network, so route guards can consult it
/// synchronously. Network operations take the [`ApiClient`] they should use.
pub struct SessionState {
    identity: RwLock<SessionIdentity>,
    store: Arc<dyn IdentityStore>,
}

impl SessionState {
    /// Seed the session from the persisted store.
    ///
    /// An unreadable store starts the session anonymous.
    pub async fn restore(store: Arc<dyn IdentityStore>) -> Self {
        let identity = match store::load_identity(store.as_ref()).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted identity; starting anonymous");
                SessionIdentity::anonymous()
            }
        };

        tracing::info!(
            username = identity.username(),
            role = %identity.role(),
            "session restored from persisted identity"
        );

        Self::with_identity(identity, store)
    }

    pub fn with_identity(identity: SessionIdentity, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            identity: RwLock::new(identity),
            store,
        }
    }

    /// Snapshot of the current identity.
    pub fn identity(&self) -> SessionIdentity {
        self.identity.read().clone()
    }

    pub fn username(&self) -> String {
        self.identity.read().username().to_string()
    }

    pub fn is_staff(&self) -> bool {
        self.identity.read().is_staff()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.read().is_authenticated()
    }

    pub fn role(&self) -> Role {
        self.identity.read().role()
    }

    /// Drop to anonymous. The persisted slots are left as they are.
    pub fn clear(&self) {
        *self.identity.write() = SessionIdentity::anonymous();
    }

    /// Renew the session credential. Identity fields are untouched.
    ///
    /// Goes straight to the request primitive: a failure here is final and
    /// must not itself trigger recovery.
    pub async fn refresh(&self, api: &ApiClient) -> Result<(), ApiError> {
        match api.dispatch(&ApiRequest::post(endpoints::TOKEN_REFRESH)).await {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::debug!(error = %err, "credential refresh rejected");
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Fetch `who am I` and replace the identity.
    ///
    /// Both fields are persisted first and swapped in memory only after the
    /// write succeeds, so any failure leaves both copies as they were.
    ///
    /// A 401 the transport could not recover is returned as is; every other
    /// failure is wrapped in [`ApiError::IdentityLoad`].
    pub async fn load_identity(&self, api: &ApiClient) -> Result<SessionIdentity, ApiError> {
        let record: IdentityRecord = match api.get_json(endpoints::USER_ME).await {
            Ok(record) => record,
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err) => return Err(ApiError::IdentityLoad(Box::new(err))),
        };

        store::save_identity(self.store.as_ref(), &record.username, record.is_staff)
            .await
            .map_err(|e| ApiError::IdentityLoad(Box::new(e.into())))?;

        let identity = SessionIdentity::from(record);
        *self.identity.write() = identity.clone();

        tracing::info!(
            username = identity.username(),
            role = %identity.role(),
            "identity loaded"
        );

        Ok(identity)
    }

    /// Exchange credentials for a session, then load the identity.
    ///
    /// The login call bypasses refresh recovery: a 401 here means the
    /// credentials were wrong, not that a session expired.
    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, ApiError> {
        let request = ApiRequest::post(endpoints::TOKEN_LOGIN).with_json(json!({
            "username": username,
            "password": password,
        }));

        match api.dispatch(&request).await {
            Ok(_) => {}
            Err(ApiError::Unauthorized { .. }) => {
                tracing::info!(username, "login rejected");
                return Err(ApiError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        }

        tracing::info!(username, "logged in");
        self.load_identity(api).await
    }

    /// End the session on the backend and drop to anonymous.
    ///
    /// The in-memory identity is cleared even when the backend call fails;
    /// that failure is still returned.
    pub async fn logout(&self, api: &ApiClient) -> Result<(), ApiError> {
        let result = api.send(ApiRequest::post(endpoints::TOKEN_LOGOUT)).await;
        self.clear();

        match result {
            Ok(_) => {
                tracing::info!("logged out");
                Ok(())
            }
            Err(ApiError::Status { status, .. }) if status == StatusCode::BAD_REQUEST.as_u16() => {
                // No refresh cookie at all: the backend had no session to end.
                tracing::info!("logged out (no active backend session)");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "backend logout failed");
                Err(err)
            }
        }
    }
}

impl core::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionState")
            .field("identity", &*self.identity.read())
            .finish_non_exhaustive()
    }
}
