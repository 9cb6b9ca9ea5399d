//! `quizdesk-auth`: pure navigation authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: every decision
//! is a function of the current [`SessionIdentity`](quizdesk_core::SessionIdentity).

pub mod authorize;
pub mod requirement;
pub mod router;
pub mod routes;

pub use authorize::{AuthzError, GuardDecision, authorize, guard, index_destination};
pub use requirement::Requirement;
pub use router::{Navigation, Router};
pub use routes::{RouteDef, RouteName};
