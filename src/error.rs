//! Shared error-code contract.
//!
//! Every error enum in the crate maps each variant to a stable, grepable
//! code the host can show or branch on without parsing messages.

/// Grepable error code and retryable flag for host-facing errors.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
