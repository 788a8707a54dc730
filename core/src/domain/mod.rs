//! Domain layer containing business entities and lifecycle rules.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
