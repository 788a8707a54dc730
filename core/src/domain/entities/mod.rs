//! Domain entities representing core business objects.

pub mod purpose;
pub mod verification_code;

// Re-export commonly used types
pub use purpose::CodePurpose;
pub use verification_code::{
    VerificationCode, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};
