//! Notification Service
//!
//! Central dispatcher that hands each alert to every enabled channel in a
//! fixed order and records one outcome per attempt.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::settings::NotifierConfig;
use crate::utils::error::AppResult;
use crate::utils::http::build_http_client;

use super::channels::telegram::TelegramChannel;
use super::channels::webhook::WebhookChannel;
use super::channels::NotifyChannel;
use super::types::*;

/// Central notification dispatcher.
///
/// Holds the channels enabled for this run, keyed by type. A channel that is
/// not registered is disabled: dispatch logs its disabled line and moves on.
pub struct NotifyService {
    channels: BTreeMap<NotifyChannelType, Arc<dyn NotifyChannel>>,
}

impl NotifyService {
    pub fn new(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        let channels = channels
            .into_iter()
            .map(|channel| (channel.channel_type(), channel))
            .collect();
        Self { channels }
    }

    /// Build the channels described by `config` over one shared HTTP client.
    ///
    /// Returns the Telegram channel separately as well, since startup chat
    /// discovery talks to it directly.
    pub fn from_config(
        config: &NotifierConfig,
    ) -> AppResult<(Self, Option<Arc<TelegramChannel>>)> {
        let client = build_http_client(config.poll.http_timeout())?;
        let mut channels: Vec<Arc<dyn NotifyChannel>> = Vec::new();

        if let Some(ref webhook) = config.webhook {
            channels.push(Arc::new(WebhookChannel::new(client.clone(), webhook.clone())));
        }

        let telegram = config
            .telegram
            .as_ref()
            .map(|settings| Arc::new(TelegramChannel::new(client.clone(), settings.clone())));
        // a token without recipients is only good for discovery
        if let Some(ref telegram) = telegram {
            if !telegram.settings().chat_ids.is_empty() {
                channels.push(telegram.clone());
            }
        }

        Ok((Self::new(channels), telegram))
    }

    pub fn is_enabled(&self, channel_type: NotifyChannelType) -> bool {
        self.channels.contains_key(&channel_type)
    }

    /// Deliver `notification` through every channel: webhook first, then
    /// Telegram.
    ///
    /// Channel failures are logged and reported in the outcomes, never
    /// returned as errors. Disabled channels produce no outcome.
    pub async fn dispatch(&self, notification: &ChatNotification) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::new();

        for channel_type in [NotifyChannelType::Webhook, NotifyChannelType::Telegram] {
            let Some(channel) = self.channels.get(&channel_type) else {
                tracing::info!("{}", channel_type.disabled_message());
                continue;
            };

            let attempted_at = chrono::Utc::now().to_rfc3339();
            let (status, error) = match channel.send(notification).await {
                Ok(()) => (DeliveryStatus::Success, None),
                Err(e) => {
                    tracing::warn!(
                        channel = %channel_type,
                        kind = ?notification.kind,
                        session_id = ?notification.session_id,
                        attempted_at = %attempted_at,
                        error = %e,
                        "Notification delivery failed"
                    );
                    (DeliveryStatus::Failed, Some(e.to_string()))
                }
            };

            outcomes.push(DeliveryOutcome {
                channel: channel_type,
                kind: notification.kind,
                status,
                error,
                attempted_at,
            });
        }

        outcomes
    }
}

/// Number of failed deliveries in a dispatch result.
pub fn failed_outcomes(outcomes: &[DeliveryOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_success()).count()
}
