//! Matrix-Style Webhook Channel
//!
//! Form-encoded HTTP POST carrying `text`, `html` and `msgtype` fields.

use async_trait::async_trait;

use super::NotifyChannel;
use crate::models::settings::WebhookSettings;
use crate::services::notify::types::*;

const WEBHOOK_MSGTYPE: &str = "m.text";

/// Generic webhook for chat bridges (e.g. a Matrix hookshot endpoint).
///
/// Any 2xx response counts as delivered.
pub struct WebhookChannel {
    client: reqwest::Client,
    settings: WebhookSettings,
}

impl WebhookChannel {
    pub fn new(client: reqwest::Client, settings: WebhookSettings) -> Self {
        Self { client, settings }
    }

    pub fn form_fields(notification: &ChatNotification) -> [(&'static str, String); 3] {
        [
            ("text", notification.text.clone()),
            ("html", notification.html_or_text().to_string()),
            ("msgtype", WEBHOOK_MSGTYPE.to_string()),
        ]
    }
}

#[async_trait]
impl NotifyChannel for WebhookChannel {
    fn channel_type(&self) -> NotifyChannelType {
        NotifyChannelType::Webhook
    }

    async fn send(&self, notification: &ChatNotification) -> Result<(), NotifyError> {
        let response = match self
            .client
            .post(&self.settings.url)
            .form(&Self::form_fields(notification))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to send message to webhook: {}", e);
                return Err(e.into());
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Failed to send message to webhook: {} {}", status, body);
            return Err(NotifyError::HttpError(format!(
                "Webhook returned HTTP {}: {}",
                status, body
            )));
        }

        tracing::info!("Message sent to webhook.");
        Ok(())
    }
}
