//! Chat Notifier Core
//!
//! Session model, data source trait, and error types for the Zammad chat
//! notifier workspace. This crate has zero dependencies on application-level
//! code (database driver, HTTP client, runtime).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `session` - Chat session rows and the `SessionSource` trait
//!
//! ## Design Principles
//!
//! 1. **Only serde, async-trait and thiserror** as dependencies
//! 2. **Trait-based abstractions** - the detector is tested against in-memory sources
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod session;

// Error types
pub use error::{CoreError, CoreResult};

// Session model
pub use session::{
    ChatSessionState, SessionId, SessionSource, StartedSession, WaitingSession,
    UNKNOWN_AGENT_NAME,
};
