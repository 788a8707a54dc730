//! Error types for the verification engine.
//!
//! Expected control-flow failures (rate limit exceeded, invalid code) are
//! typed variants rather than strings so call sites can handle them
//! exhaustively. Translation to transport-level status codes is the
//! caller's responsibility.

use thiserror::Error;

/// Errors surfaced by the verification engine
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Issuance blocked by the sliding-window ceiling.
    ///
    /// Recoverable: the caller can retry after `wait_minutes`.
    #[error("Too many codes requested. Please try again in {wait_minutes} minutes")]
    RateLimitExceeded { wait_minutes: u32 },

    /// Confirmation failed.
    ///
    /// Deliberately collapses "no active code", "expired", "locked" and
    /// "wrong code" into one variant so callers cannot enumerate which
    /// failure occurred.
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    /// The code store failed; fatal to the current call
    #[error("Code store error: {message}")]
    Store { message: String },
}

impl VerificationError {
    /// Stable error code for transport layers
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            VerificationError::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            VerificationError::Store { .. } => "STORE_ERROR",
        }
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_contains_wait() {
        let error = VerificationError::RateLimitExceeded { wait_minutes: 12 };
        assert!(error.to_string().contains("12 minutes"));
        assert_eq!(error.error_code(), "RATE_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_invalid_code_message_is_generic() {
        // The message must not reveal whether the code was wrong, expired
        // or locked
        let error = VerificationError::InvalidOrExpiredCode;
        assert_eq!(error.to_string(), "Invalid or expired verification code");
        assert_eq!(error.error_code(), "INVALID_OR_EXPIRED_CODE");
    }
}
