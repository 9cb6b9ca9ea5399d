//! Route guards: synchronous allow/redirect decisions.

use thiserror::Error;

use quizdesk_core::SessionIdentity;

use crate::{Requirement, RouteName};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: staff role required")]
    NotStaff,
}

/// Outcome of consulting a guard before entering a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(RouteName),
}

/// Check an identity against a route requirement.
///
/// - No IO
/// - No panics
/// - Trusts whatever the identity currently holds, including values seeded
///   from the persisted store before the first network round-trip
pub fn authorize(identity: &SessionIdentity, required: Requirement) -> Result<(), AuthzError> {
    match required {
        Requirement::Public => Ok(()),
        Requirement::Authenticated if identity.is_authenticated() => Ok(()),
        Requirement::Authenticated => Err(AuthzError::NotAuthenticated),
        Requirement::Staff if !identity.is_authenticated() => Err(AuthzError::NotAuthenticated),
        Requirement::Staff if identity.is_staff() => Ok(()),
        Requirement::Staff => Err(AuthzError::NotStaff),
    }
}

/// Guard wrapper around [`authorize`]: every denial redirects to the login view.
pub fn guard(identity: &SessionIdentity, required: Requirement) -> GuardDecision {
    match authorize(identity, required) {
        Ok(()) => GuardDecision::Allow,
        Err(err) => {
            tracing::debug!(requirement = %required, error = %err, "guard redirecting to login");
            GuardDecision::Redirect(RouteName::Login)
        }
    }
}

/// Where the top-level index route sends the current identity.
pub fn index_destination(identity: &SessionIdentity) -> RouteName {
    if !identity.is_authenticated() {
        RouteName::Login
    } else if identity.is_staff() {
        RouteName::InstructorDashboard
    } else {
        RouteName::StudentQuiz
    }
}
