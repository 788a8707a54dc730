//! # OTP Engine Core
//!
//! Core domain layer for the one-time verification-code engine.
//! This crate contains the code entity and lifecycle rules, the code store
//! contract with an in-memory adapter, and the verification services
//! (generation, hashing, rate limiting, issuance and confirmation).

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
