//! Configuration for the verification engine

use serde::Deserialize;

use crate::domain::entities::verification_code::{
    CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};

/// Configuration for the verification engine
///
/// Read once at construction; never re-read per call. The hashing secret is
/// required and has no default: it is the server-side component of every
/// code digest, so a leaked store alone is not enough to forge codes.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Length of generated plaintext codes
    pub code_length: usize,
    /// Number of minutes before a code expires
    pub code_ttl_minutes: i64,
    /// Maximum number of failed confirmation attempts per code
    pub max_attempts: i32,
    /// Maximum codes issued per subject and purpose within the window
    pub rate_limit_max_codes: i64,
    /// Sliding-window length for rate limiting, in minutes
    pub rate_limit_window_minutes: i64,
    /// Server-side secret mixed into every code digest
    pub hashing_secret: String,
}

impl VerificationConfig {
    /// Create a configuration with the default limits and the given secret
    pub fn new(hashing_secret: impl Into<String>) -> Self {
        Self {
            code_length: CODE_LENGTH,
            code_ttl_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            rate_limit_max_codes: 3,
            rate_limit_window_minutes: 60,
            hashing_secret: hashing_secret.into(),
        }
    }
}
