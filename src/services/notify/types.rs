//! Notification Core Types
//!
//! Messages handed to the channels, per-channel delivery outcomes, and the
//! channel error type.

use std::fmt;

use chat_notifier_core::{SessionId, StartedSession};
use serde::{Deserialize, Serialize};

pub const STARTUP_MESSAGE: &str = "Zammad Notifier started.";

/// Supported notification channel types.
///
/// Ordering is dispatch order: the webhook is attempted before Telegram.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NotifyChannelType {
    Webhook,
    Telegram,
}

impl fmt::Display for NotifyChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => write!(f, "webhook"),
            Self::Telegram => write!(f, "telegram"),
        }
    }
}

impl NotifyChannelType {
    /// Log line emitted when this channel is disabled for the run.
    pub fn disabled_message(&self) -> &'static str {
        match self {
            Self::Webhook => "No Webhook URL configured.",
            Self::Telegram => "No Telegram Chat IDs or Bot Token configured.",
        }
    }
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    /// Process came up
    Startup,
    /// A session entered `waiting`
    ChatWaiting,
    /// A tracked session moved to `running`
    ChatStarted,
    /// Startup reply telling a new Telegram chat its identifier
    ChatIdDiscovery,
}

/// A human-readable alert, rendered once and delivered to every channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatNotification {
    pub kind: NotificationKind,
    pub text: String,
    /// HTML variant for the webhook; falls back to `text`
    pub html: Option<String>,
    /// Suppress the recipient's alert sound (Telegram only)
    pub silent: bool,
    pub session_id: Option<SessionId>,
}

impl ChatNotification {
    pub fn startup() -> Self {
        Self {
            kind: NotificationKind::Startup,
            text: STARTUP_MESSAGE.to_string(),
            html: None,
            silent: true,
            session_id: None,
        }
    }

    pub fn chat_waiting(id: SessionId) -> Self {
        Self {
            kind: NotificationKind::ChatWaiting,
            text: format!("There is a waiting chat with ID {}.", id),
            html: None,
            silent: false,
            session_id: Some(id),
        }
    }

    pub fn chat_started(session: &StartedSession) -> Self {
        Self {
            kind: NotificationKind::ChatStarted,
            text: format!(
                "Chat with ID {} has been taken by {}.",
                session.id,
                session.agent_name()
            ),
            html: None,
            silent: false,
            session_id: Some(session.id),
        }
    }

    pub fn chat_id_discovery(chat_id: &str) -> Self {
        Self {
            kind: NotificationKind::ChatIdDiscovery,
            text: format!("Your Telegram Chat ID is: {}", chat_id),
            html: None,
            silent: false,
            session_id: None,
        }
    }

    /// HTML body for channels that accept one.
    pub fn html_or_text(&self) -> &str {
        self.html.as_deref().unwrap_or(&self.text)
    }
}

/// Delivery status for one channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryStatus {
    Success,
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of handing one notification to one channel. Never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub channel: NotifyChannelType,
    pub kind: NotificationKind,
    pub status: DeliveryStatus,
    pub error: Option<String>,
    pub attempted_at: String,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        self.status == DeliveryStatus::Success
    }
}

/// Notification channel errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
