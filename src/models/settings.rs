//! Settings Models
//!
//! Runtime configuration for the notifier: channel credentials, database
//! connection parameters, and the poll/timeout/backoff policy.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_DB_NAME: &str = "zammad_production";
pub const DEFAULT_DB_USER: &str = "zammad";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Complete notifier configuration, resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Telegram bot channel; `None` disables it for the run
    pub telegram: Option<TelegramSettings>,
    /// Webhook channel; `None` disables it for the run
    pub webhook: Option<WebhookSettings>,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram: None,
            webhook: None,
            database: DatabaseSettings::default(),
            poll: PollSettings::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl NotifierConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref telegram) = self.telegram {
            if telegram.bot_token.trim().is_empty() {
                return Err("Telegram bot token must not be empty".to_string());
            }
            if !is_http_url(&telegram.api_base) {
                return Err(format!(
                    "Invalid Telegram API base: {}. Must start with http:// or https://",
                    telegram.api_base
                ));
            }
        }

        if let Some(ref webhook) = self.webhook {
            if !is_http_url(&webhook.url) {
                return Err(format!(
                    "Invalid webhook URL: {}. Must start with http:// or https://",
                    webhook.url
                ));
            }
        }

        if self.database.port == 0 {
            return Err("Database port must be greater than 0".to_string());
        }

        if self.poll.interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }
        if self.poll.query_timeout_ms == 0 || self.poll.http_timeout_ms == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }

        if self.retry.max_attempts == 0 {
            return Err("Retry max_attempts must be at least 1".to_string());
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err("Retry base_delay_ms cannot exceed max_delay_ms".to_string());
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Telegram bot configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    /// Bot token. Excluded from serialization to prevent accidental exposure.
    #[serde(skip_serializing, default)]
    pub bot_token: String,
    /// Recipient chat identifiers, as configured
    #[serde(default)]
    pub chat_ids: Vec<String>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    DEFAULT_TELEGRAM_API_BASE.to_string()
}

impl TelegramSettings {
    pub fn new(bot_token: impl Into<String>, chat_ids: Vec<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_ids,
            api_base: default_telegram_api_base(),
        }
    }

    /// `{api_base}/bot{token}/{method}`
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }

    /// Whether `chat_id` is already among the configured recipients.
    pub fn is_known_chat(&self, chat_id: &str) -> bool {
        self.chat_ids.iter().any(|known| known == chat_id)
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"<redacted>")
            .field("chat_ids", &self.chat_ids)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Webhook endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    pub url: String,
}

/// Zammad PostgreSQL connection parameters
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub dbname: String,
    pub user: String,
    /// Password. Excluded from serialization to avoid accidental persistence.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            dbname: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Poll cadence and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Sleep between poll cycles
    pub interval_ms: u64,
    /// Upper bound on one cycle's data source work
    pub query_timeout_ms: u64,
    /// Upper bound on a single outbound HTTP request
    pub http_timeout_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

/// Backoff applied after a failed poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Consecutive failed cycles tolerated before the loop gives up (default: 5)
    pub max_attempts: u32,
    /// Base delay in milliseconds for exponential backoff (default: 1000)
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (default: 30000)
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the `attempt`-th consecutive failure (0-based).
    ///
    /// Formula: `min(2^attempt * base_delay_ms, max_delay_ms)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}
