//! `quizdesk-client`
//!
//! **Responsibility:** session and authorization core of the quiz client.
//!
//! This crate provides:
//! - Persisted identity slots that pre-seed the session at startup
//! - Session state (refresh, identity load, login, logout)
//! - The authenticated transport with one-shot refresh-and-retry
//! - A single-slot unauthorized-session callback
//!
//! Views stay outside this crate: they read identity from [`SessionState`],
//! send requests through [`ApiClient`], and ask [`quizdesk_auth::Router`]
//! where a navigation attempt lands.

pub mod callback;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod navigator;
pub mod session;
pub mod store;
pub mod transport;

pub use callback::UnauthorizedSlot;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{ApiRequest, ApiResponse, HttpBackend, ReqwestBackend};
pub use navigator::Navigator;
pub use session::SessionState;
pub use store::{IdentityStore, MemoryIdentityStore, SqliteIdentityStore, StoreError};
pub use transport::ApiClient;
