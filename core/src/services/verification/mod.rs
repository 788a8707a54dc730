//! Verification service module for one-time code authentication
//!
//! This module provides the complete verification code workflow:
//! - Cryptographically secure code generation
//! - Salted digest hashing and constant-time validation
//! - Sliding-window rate limiting per subject and purpose
//! - Issuance, confirmation with attempt tracking and lockout
//! - Bulk invalidation of superseded codes on confirmation

mod config;
mod generator;
mod hasher;
mod rate_limiter;
mod service;
mod traits;
mod types;


pub use config::VerificationConfig;
pub use generator::{CodeGenerator, CODE_ALPHABET};
pub use hasher::CodeHasher;
pub use rate_limiter::RateLimiter;
pub use service::VerificationService;
pub use traits::NotifierTrait;
pub use types::{IssuedCode, Recipient};
