//! Notifier implementations: code delivery collaborators.

pub mod log_notifier;

pub use log_notifier::LogNotifier;
