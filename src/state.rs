//! Notifier Context
//!
//! Explicit runtime context built once at startup: configuration, session
//! source, and notification dispatcher.

use std::future::Future;
use std::sync::Arc;

use chat_notifier_core::SessionSource;

use crate::models::settings::NotifierConfig;
use crate::services::detector::TransitionDetector;
use crate::services::notify::service::failed_outcomes;
use crate::services::notify::{discover_chat_ids, ChatNotification, NotifyService, TelegramChannel};
use crate::services::poller::{PollLoop, PollSummary};
use crate::storage::PostgresSessionSource;
use crate::utils::error::{AppError, AppResult};

/// Runtime context owned by `main`
pub struct NotifierContext {
    config: NotifierConfig,
    /// Session store the detector reads from
    source: Arc<dyn SessionSource>,
    /// Set when `source` is the production database, so shutdown can close it
    postgres: Option<Arc<PostgresSessionSource>>,
    notifier: Arc<NotifyService>,
    telegram: Option<Arc<TelegramChannel>>,
}

impl NotifierContext {
    /// Validate the configuration, connect to PostgreSQL and build the
    /// enabled channels.
    pub async fn initialize(config: NotifierConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::config)?;

        let postgres = Arc::new(
            PostgresSessionSource::connect(config.database.clone(), config.poll.query_timeout())
                .await?,
        );
        let mut context = Self::with_source(config, postgres.clone())?;
        context.postgres = Some(postgres);
        Ok(context)
    }

    /// Build a context over an arbitrary session source.
    pub fn with_source(config: NotifierConfig, source: Arc<dyn SessionSource>) -> AppResult<Self> {
        let (notifier, telegram) = NotifyService::from_config(&config)?;
        Ok(Self {
            config,
            source,
            postgres: None,
            notifier: Arc::new(notifier),
            telegram,
        })
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    pub fn notifier(&self) -> Arc<NotifyService> {
        self.notifier.clone()
    }

    /// Tell unknown Telegram chats their id, then send the silent startup
    /// notice to every channel. Never fails.
    pub async fn announce_startup(&self) -> Vec<String> {
        let discovered = match self.telegram {
            Some(ref telegram) => discover_chat_ids(telegram).await,
            None => Vec::new(),
        };
        let outcomes = self.notifier.dispatch(&ChatNotification::startup()).await;
        let failed = failed_outcomes(&outcomes);
        if failed > 0 {
            tracing::warn!(failed, "Startup notice was not delivered to every channel");
        }
        discovered
    }

    /// A fresh poll loop with an empty notified-set.
    pub fn poll_loop(&self) -> PollLoop {
        let detector = TransitionDetector::new(self.source.clone(), self.notifier.clone())
            .with_query_timeout(self.config.poll.query_timeout());
        PollLoop::new(detector, self.config.poll.interval(), self.config.retry.clone())
    }

    pub async fn run_until<F>(&self, shutdown: F) -> AppResult<PollSummary>
    where
        F: Future<Output = ()>,
    {
        self.poll_loop().run_until(shutdown).await
    }

    /// Release the database connection.
    pub async fn shutdown(&self) {
        if let Some(ref postgres) = self.postgres {
            postgres.close().await;
        }
        tracing::info!("Zammad Telegram Notifier stopped");
    }
}
