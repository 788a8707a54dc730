//! MySQL repository implementations

pub mod code_repository_impl;

pub use code_repository_impl::MySqlCodeRepository;
