//! Utilities
//!
//! Common utilities used throughout the notifier.

pub mod error;
pub mod http;

pub use error::*;
pub use http::*;
