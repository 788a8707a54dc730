//! Notifier adapters for out-of-band code delivery

pub mod logging;

pub use logging::LoggingNotifier;
