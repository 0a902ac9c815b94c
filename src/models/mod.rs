//! Data Models
//!
//! Configuration structures used throughout the notifier.

pub mod settings;

pub use settings::*;
