//! Telegram Chat ID Discovery
//!
//! At startup, reads the bot's pending updates and replies to every chat that
//! is not yet a configured recipient with its own chat identifier, so an
//! operator can add it to `MSGTELEGRAM_CHATIDS`.

use crate::models::settings::TelegramSettings;

use super::channels::telegram::{TelegramChannel, TelegramUpdate};
use super::types::ChatNotification;

/// Distinct chat ids seen in `updates` that are not configured recipients,
/// in first-seen order. Updates without a message are skipped.
pub fn new_chat_ids(updates: &[TelegramUpdate], settings: &TelegramSettings) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for update in updates {
        let Some(ref message) = update.message else {
            continue;
        };
        let chat_id = message.chat.id.to_string();
        if settings.is_known_chat(&chat_id) || ids.contains(&chat_id) {
            continue;
        }
        ids.push(chat_id);
    }
    ids
}

/// Announce chat ids to chats that have messaged the bot.
///
/// Returns the ids that were successfully told their identifier. Never fails:
/// errors are logged and discovery is skipped.
pub async fn discover_chat_ids(telegram: &TelegramChannel) -> Vec<String> {
    let updates = match telegram.get_updates().await {
        Ok(updates) => updates,
        Err(e) => {
            tracing::warn!(error = %e, "Telegram chat ID discovery failed");
            return Vec::new();
        }
    };

    let mut announced = Vec::new();
    for chat_id in new_chat_ids(&updates, telegram.settings()) {
        let notification = ChatNotification::chat_id_discovery(&chat_id);
        match telegram
            .send_to(&chat_id, &notification.text, notification.silent)
            .await
        {
            Ok(()) => {
                tracing::info!(chat_id = %chat_id, "Message sent to chat ID {}", chat_id);
                announced.push(chat_id);
            }
            Err(e) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    "Failed to send message to chat ID {}: {}",
                    chat_id,
                    e
                );
            }
        }
    }

    if !announced.is_empty() {
        tracing::info!(count = announced.len(), "Announced Telegram chat IDs");
    }
    announced
}
