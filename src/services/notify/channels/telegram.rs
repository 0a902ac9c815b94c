//! Telegram Bot API Notification Channel
//!
//! Sends notifications to every configured chat via the bot API
//! `send_message` method, and reads `getUpdates` for startup chat discovery.

use async_trait::async_trait;
use serde::Deserialize;

use super::NotifyChannel;
use crate::models::settings::TelegramSettings;
use crate::services::notify::types::*;

/// Telegram bot sender.
///
/// API endpoint: `{api_base}/bot<token>/send_message`, form-encoded with
/// `chat_id`, `text` and `disable_notification`.
pub struct TelegramChannel {
    client: reqwest::Client,
    settings: TelegramSettings,
}

/// `getUpdates` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GetUpdatesResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<TelegramUpdate>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One incoming update. Only message updates carry a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

impl TelegramChannel {
    pub fn new(client: reqwest::Client, settings: TelegramSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &TelegramSettings {
        &self.settings
    }

    /// Form body for one `send_message` call.
    pub fn form_fields(chat_id: &str, text: &str, silent: bool) -> [(&'static str, String); 3] {
        [
            ("chat_id", chat_id.to_string()),
            ("text", text.to_string()),
            ("disable_notification", silent.to_string()),
        ]
    }

    /// Send `text` to a single chat. Only HTTP 200 counts as delivered.
    pub async fn send_to(
        &self,
        chat_id: &str,
        text: &str,
        silent: bool,
    ) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.settings.method_url("send_message"))
            .form(&Self::form_fields(chat_id, text, silent))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::HttpError(body));
        }

        Ok(())
    }

    /// Fetch pending updates from the bot API.
    pub async fn get_updates(&self) -> Result<Vec<TelegramUpdate>, NotifyError> {
        let response = self
            .client
            .get(self.settings.method_url("getUpdates"))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NotifyError::HttpError(format!(
                "Telegram returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: GetUpdatesResponse = serde_json::from_str(&body)?;
        if !parsed.ok {
            return Err(NotifyError::HttpError(
                parsed
                    .description
                    .unwrap_or_else(|| "getUpdates returned ok=false".to_string()),
            ));
        }
        Ok(parsed.result)
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    fn channel_type(&self) -> NotifyChannelType {
        NotifyChannelType::Telegram
    }

    async fn send(&self, notification: &ChatNotification) -> Result<(), NotifyError> {
        if self.settings.chat_ids.is_empty() {
            return Err(NotifyError::InvalidConfig(
                NotifyChannelType::Telegram.disabled_message().to_string(),
            ));
        }

        let mut failed = 0usize;
        for chat_id in &self.settings.chat_ids {
            match self
                .send_to(chat_id, &notification.text, notification.silent)
                .await
            {
                Ok(()) => {
                    tracing::info!(chat_id = %chat_id, "Message sent to chat ID {}", chat_id)
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        chat_id = %chat_id,
                        "Failed to send message to chat ID {}: {}",
                        chat_id,
                        e
                    );
                }
            }
        }

        if failed > 0 {
            return Err(NotifyError::HttpError(format!(
                "{} of {} Telegram deliveries failed",
                failed,
                self.settings.chat_ids.len()
            )));
        }
        Ok(())
    }
}
