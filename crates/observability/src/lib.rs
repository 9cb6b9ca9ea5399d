//! Process-wide logging setup shared by the client binary and tests.

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide observability.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}
