//! # OTP Engine Infrastructure Layer
//!
//! Concrete adapters behind the core contracts:
//! - **Database**: MySQL implementation of the code store contract, using SQLx.
//!   Transport failures are mapped into `VerificationError::Store` at the
//!   trait boundary.
//! - **Notify**: notifier adapters for out-of-band code delivery

pub mod database;
pub mod notify;

// Re-export core types for convenience
pub use otp_core::errors::{VerificationError, VerificationResult};
