//! Notification Channel Trait
//!
//! Defines the async trait that both outbound senders implement, plus the
//! channel module exports.

pub mod telegram;
pub mod webhook;

use async_trait::async_trait;

use super::types::{ChatNotification, NotifyChannelType, NotifyError};

/// Async trait for notification channel implementations.
///
/// Each channel formats the notification for its platform and sends it over
/// HTTP using the shared `reqwest::Client` it received at construction.
/// Implementations log their own success/failure lines.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Channel type identifier.
    fn channel_type(&self) -> NotifyChannelType;

    /// Send a notification through this channel.
    async fn send(&self, notification: &ChatNotification) -> Result<(), NotifyError>;
}
