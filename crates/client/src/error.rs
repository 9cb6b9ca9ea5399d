use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the transport and session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401 from `path`.
    #[error("unauthorized: {path}")]
    Unauthorized { path: String },

    /// The credential-renewal call failed.
    #[error("session expired")]
    SessionExpired,

    /// `GET /api/user/me/` (or persisting its result) failed; identity unchanged.
    #[error("failed to load identity: {0}")]
    IdentityLoad(Box<ApiError>),

    #[error("invalid username or password")]
    InvalidCredentials,

    /// Any other non-success status.
    #[error("API error ({status}) from {path}: {body}")]
    Status { status: u16, path: String, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("identity store error: {0}")]
    Store(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err.to_string())
    }
}
