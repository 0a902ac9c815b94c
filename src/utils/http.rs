//! HTTP Client Factory
//!
//! Builds the single `reqwest::Client` shared by every notification channel.

use std::time::Duration;

use crate::utils::error::{AppError, AppResult};

/// User agent sent with every outbound notification request.
pub const USER_AGENT: &str = concat!("zammad-chat-notifier/", env!("CARGO_PKG_VERSION"));

/// Build a `reqwest::Client` whose requests give up after `timeout`.
///
/// Proxy settings are taken from the standard `HTTPS_PROXY` / `HTTP_PROXY`
/// environment variables by reqwest itself.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))
}
