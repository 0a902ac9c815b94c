//! Integration Tests Module
//!
//! End-to-end tests for the notifier: detector + dispatcher over an in-memory
//! session store, and the Telegram/webhook wire formats against a local HTTP
//! capture server.

// Capture server and config helpers
mod support;

// Transition detection through to delivered alerts
mod detector_test;
