//! Zammad Chat Notifier
//!
//! Watches the Zammad chat session table and relays alerts when a chat starts
//! waiting for an agent and when an agent takes it. It includes:
//! - Transition detection with a deduplicating notified-set
//! - Telegram bot and webhook notification channels
//! - PostgreSQL session store and environment configuration
//! - A poll loop with timeouts and exponential backoff

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::NotifierConfig;
pub use services::detector::{ScanReport, TransitionDetector};
pub use services::notify::{ChatNotification, NotifyService};
pub use services::poller::{PollLoop, PollSummary};
pub use state::NotifierContext;
