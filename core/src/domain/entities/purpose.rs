//! Purpose variants scoping verification codes and their rate-limit buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The functional reason a verification code was issued.
///
/// Distinct purposes never share a code or a rate-limit bucket: a
/// `Registration` code can never satisfy a `Login` confirmation, even for
/// the same subject and an identical plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodePurpose {
    /// Confirming a newly registered account
    Registration,
    /// Challenge during login
    Login,
    /// Proving control of the account before a password reset
    PasswordReset,
}

impl CodePurpose {
    /// Numeric code used for persisted storage
    pub fn as_code(&self) -> i16 {
        match self {
            CodePurpose::Registration => 1,
            CodePurpose::Login => 2,
            CodePurpose::PasswordReset => 3,
        }
    }

    /// Resolves a persisted numeric code back to a purpose
    ///
    /// # Returns
    ///
    /// `Some(CodePurpose)` for a known code, `None` otherwise
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(CodePurpose::Registration),
            2 => Some(CodePurpose::Login),
            3 => Some(CodePurpose::PasswordReset),
            _ => None,
        }
    }

    /// Human-readable label, used in logs and notification templates
    pub fn label(&self) -> &'static str {
        match self {
            CodePurpose::Registration => "registration",
            CodePurpose::Login => "login",
            CodePurpose::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
