//! Authenticated transport: the only channel for backend calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::callback::UnauthorizedSlot;
use crate::endpoints;
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse, HttpBackend};
use crate::session::SessionState;

/// Sends requests with the ambient session credential and renews it on 401.
///
/// Recovery rules for a request that fails with 401:
/// 1. The refresh endpoint itself is never recovered.
/// 2. Otherwise `SessionState::refresh` runs once and, on success, the
///    original request is re-issued once. Whatever the retry returns is final.
/// 3. If refresh fails, the unauthorized handler runs once and the original
///    401 is returned.
///
/// Concurrent 401s each run their own refresh; there is no shared in-flight
/// refresh.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn HttpBackend>,
    session: Arc<SessionState>,
    unauthorized: UnauthorizedSlot,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn HttpBackend>, session: Arc<SessionState>) -> Self {
        Self {
            backend,
            session,
            unauthorized: UnauthorizedSlot::new(),
        }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Register the handler run when a session cannot be renewed.
    ///
    /// Replaces any previously registered handler.
    pub fn on_unauthorized<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.unauthorized.register(handler);
    }

    /// Send a request, renewing the session credential at most once.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let original = match self.dispatch(&request).await {
            Err(err @ ApiError::Unauthorized { .. }) => err,
            other => return other,
        };

        if request.is_refresh() || request.retried() {
            return Err(original);
        }

        tracing::debug!(path = %request.path, "401 received; refreshing session");

        match self.session.refresh(self).await {
            Ok(()) => {
                tracing::debug!(path = %request.path, "session refreshed; retrying once");
                self.dispatch(&request.into_retry()).await
            }
            Err(err) => {
                tracing::warn!(path = %request.path, error = %err, "session refresh failed");
                self.unauthorized.invoke();
                Err(original)
            }
        }
    }

    /// One raw round-trip with status classification and no recovery.
    pub(crate) async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, retried = request.retried(), "sending request");
        self.backend.execute(request).await?.error_for_status()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.send(ApiRequest::post(path).with_json(body)).await?.json()
    }

    pub async fn patch_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.send(ApiRequest::patch(path).with_json(body)).await?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Probe the unauthenticated health endpoint.
    pub async fn check_health(&self) -> bool {
        match self.dispatch(&ApiRequest::get(endpoints::HEALTH)).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "health check failed");
                false
            }
        }
    }
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .field("unauthorized", &self.unauthorized)
            .finish_non_exhaustive()
    }
}
