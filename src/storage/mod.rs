//! Storage Layer
//!
//! Configuration loading and the session stores the detector reads from.

pub mod config;
pub mod database;
pub mod memory;

pub use database::PostgresSessionSource;
pub use memory::InMemorySessionSource;
