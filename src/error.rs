//! Shared error contract.

/// Grepable error code and retryable flag, surfaced in JSON error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
