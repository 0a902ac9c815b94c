//! Environment Configuration Loading
//!
//! Resolves `NotifierConfig` from environment-style key/value pairs. The
//! lookup is injectable so tests never touch the process environment.

use crate::models::settings::{
    DatabaseSettings, NotifierConfig, PollSettings, RetryPolicy, TelegramSettings,
    WebhookSettings, DEFAULT_TELEGRAM_API_BASE,
};
use crate::utils::error::{AppError, AppResult};

pub const ENV_TELEGRAM_TOKEN: &str = "MSGTELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_IDS: &str = "MSGTELEGRAM_CHATIDS";
pub const ENV_TELEGRAM_API_BASE: &str = "MSGTELEGRAM_API_BASE";
pub const ENV_WEBHOOK_URL: &str = "MSGWEBHOOK_URL";
pub const ENV_DB_NAME: &str = "POSTGRESQL_DB";
pub const ENV_DB_USER: &str = "POSTGRESQL_USER";
pub const ENV_DB_PASS: &str = "POSTGRESQL_PASS";
pub const ENV_DB_HOST: &str = "POSTGRESQL_HOST";
pub const ENV_DB_PORT: &str = "POSTGRESQL_PORT";
pub const ENV_POLL_INTERVAL_MS: &str = "NOTIFIER_POLL_INTERVAL_MS";
pub const ENV_QUERY_TIMEOUT_MS: &str = "NOTIFIER_QUERY_TIMEOUT_MS";
pub const ENV_HTTP_TIMEOUT_MS: &str = "NOTIFIER_HTTP_TIMEOUT_MS";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "NOTIFIER_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "NOTIFIER_RETRY_BASE_DELAY_MS";
pub const ENV_RETRY_MAX_DELAY_MS: &str = "NOTIFIER_RETRY_MAX_DELAY_MS";

/// Load configuration from the process environment.
pub fn load_from_env() -> AppResult<NotifierConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup.
///
/// Empty values count as unset. A channel whose required key is missing is
/// disabled rather than treated as an error.
pub fn load_from_lookup<F>(lookup: F) -> AppResult<NotifierConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let telegram = get(ENV_TELEGRAM_TOKEN).map(|bot_token| TelegramSettings {
        bot_token,
        chat_ids: get(ENV_TELEGRAM_CHAT_IDS)
            .map(|raw| parse_chat_ids(&raw))
            .unwrap_or_default(),
        api_base: get(ENV_TELEGRAM_API_BASE)
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
    });

    let webhook = get(ENV_WEBHOOK_URL).map(|url| WebhookSettings { url });

    let db_defaults = DatabaseSettings::default();
    let database = DatabaseSettings {
        dbname: get(ENV_DB_NAME).unwrap_or(db_defaults.dbname),
        user: get(ENV_DB_USER).unwrap_or(db_defaults.user),
        password: get(ENV_DB_PASS),
        host: get(ENV_DB_HOST).unwrap_or(db_defaults.host),
        port: parse_number(ENV_DB_PORT, get(ENV_DB_PORT))?.unwrap_or(db_defaults.port),
    };

    let poll_defaults = PollSettings::default();
    let poll = PollSettings {
        interval_ms: parse_number(ENV_POLL_INTERVAL_MS, get(ENV_POLL_INTERVAL_MS))?
            .unwrap_or(poll_defaults.interval_ms),
        query_timeout_ms: parse_number(ENV_QUERY_TIMEOUT_MS, get(ENV_QUERY_TIMEOUT_MS))?
            .unwrap_or(poll_defaults.query_timeout_ms),
        http_timeout_ms: parse_number(ENV_HTTP_TIMEOUT_MS, get(ENV_HTTP_TIMEOUT_MS))?
            .unwrap_or(poll_defaults.http_timeout_ms),
    };

    let retry_defaults = RetryPolicy::default();
    let retry = RetryPolicy {
        max_attempts: parse_number(ENV_RETRY_MAX_ATTEMPTS, get(ENV_RETRY_MAX_ATTEMPTS))?
            .unwrap_or(retry_defaults.max_attempts),
        base_delay_ms: parse_number(ENV_RETRY_BASE_DELAY_MS, get(ENV_RETRY_BASE_DELAY_MS))?
            .unwrap_or(retry_defaults.base_delay_ms),
        max_delay_ms: parse_number(ENV_RETRY_MAX_DELAY_MS, get(ENV_RETRY_MAX_DELAY_MS))?
            .unwrap_or(retry_defaults.max_delay_ms),
    };

    let config = NotifierConfig {
        telegram,
        webhook,
        database,
        poll,
        retry,
    };
    config.validate().map_err(AppError::config)?;
    Ok(config)
}

/// Split a comma-separated chat id list, trimming and dropping empty entries.
pub fn parse_chat_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> AppResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::config(format!("{} must be a number, got '{}'", key, raw))),
    }
}
