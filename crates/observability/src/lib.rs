//! Process-wide tracing setup for auditflow hosts.
//!
//! A subscriber the host installed first always wins.

/// Initialize tracing with the format chosen by `AUDITFLOW_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filter, output format).
pub mod tracing;
