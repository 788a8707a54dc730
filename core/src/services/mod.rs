//! Business services containing the verification engine and its parts.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    CodeGenerator, CodeHasher, IssuedCode, NotifierTrait, RateLimiter, Recipient,
    VerificationConfig, VerificationService,
};
