//! Repository contracts consumed by the verification engine.

pub mod code;

pub use code::{CodeRepository, InMemoryCodeRepository};
