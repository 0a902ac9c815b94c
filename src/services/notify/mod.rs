//! Notification Delivery
//!
//! Outbound alert channels (Telegram bot API, webhook), the dispatcher that
//! fans alerts out to them, and startup chat ID discovery.

pub mod channels;
pub mod discovery;
pub mod service;
pub mod types;

pub use channels::telegram::TelegramChannel;
pub use channels::webhook::WebhookChannel;
pub use channels::NotifyChannel;
pub use discovery::discover_chat_ids;
pub use service::NotifyService;
pub use types::*;
