//! `quizdesk-core`: session identity primitives.
//!
//! This crate contains **pure** identity types (no network, no storage).

pub mod identity;
pub mod role;

pub use identity::{IdentityRecord, SessionIdentity, decode_staff_flag, encode_staff_flag};
pub use role::Role;
