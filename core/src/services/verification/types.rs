//! Types for verification engine results

use crate::domain::entities::verification_code::VerificationCode;

/// Delivery details for the notifier, supplied by the calling layer
///
/// The engine operates purely on `(subject_id, purpose)` and does not know
/// user contact details; the caller owns the user model and passes them in.
#[derive(Debug, Clone)]
pub struct Recipient {
    /// Channel address the code is delivered to
    pub destination: String,
    /// Display name used in the notification
    pub name: String,
}

impl Recipient {
    pub fn new(destination: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            name: name.into(),
        }
    }
}

/// Result of issuing a verification code
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The plaintext code, returned once for delivery and never persisted
    pub plaintext: String,
    /// The persisted code row (digest, expiry, attempt state)
    pub code: VerificationCode,
}
