//! Chat Session Transition Detector
//!
//! Reconciles the in-memory notified-set against the session store on every
//! poll cycle. A session produces exactly one waiting alert when it is first
//! seen in `waiting`, and exactly one started alert when it is later seen in
//! `running`.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chat_notifier_core::{CoreResult, SessionId, SessionSource};
use serde::Serialize;

use crate::models::settings::DEFAULT_QUERY_TIMEOUT_MS;
use crate::services::notify::service::failed_outcomes;
use crate::services::notify::{ChatNotification, NotifyService};
use crate::utils::error::{AppError, AppResult};

/// Counts from one `poll_once` cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub waiting_notified: usize,
    pub started_notified: usize,
    /// Channel deliveries that failed during the cycle
    pub failed_deliveries: usize,
    /// Size of the notified-set after the cycle
    pub tracked: usize,
}

pub struct TransitionDetector {
    source: Arc<dyn SessionSource>,
    notifier: Arc<NotifyService>,
    /// Sessions alerted as waiting and not yet alerted as started
    notified: HashSet<SessionId>,
    query_timeout: Duration,
    /// Failed deliveries since the last `poll_once`
    failed_deliveries: usize,
}

impl TransitionDetector {
    pub fn new(source: Arc<dyn SessionSource>, notifier: Arc<NotifyService>) -> Self {
        Self {
            source,
            notifier,
            notified: HashSet::new(),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            failed_deliveries: 0,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Alert on every waiting session not yet in the notified-set.
    ///
    /// Returns the number of waiting alerts emitted.
    pub async fn scan_waiting(&mut self) -> AppResult<usize> {
        let waiting = self
            .bounded("waiting sessions query", self.source.waiting_sessions())
            .await?;

        let mut emitted = 0;
        for session in waiting {
            if self.notified.contains(&session.id) {
                continue;
            }
            tracing::info!(session_id = session.id, "Found waiting chat with ID {}.", session.id);
            let outcomes = self
                .notifier
                .dispatch(&ChatNotification::chat_waiting(session.id))
                .await;
            self.failed_deliveries += failed_outcomes(&outcomes);
            self.notified.insert(session.id);
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Alert on every tracked session that is now running, and stop tracking it.
    ///
    /// Skips the query entirely while nothing is tracked.
    pub async fn scan_started(&mut self) -> AppResult<usize> {
        if self.notified.is_empty() {
            return Ok(0);
        }

        let mut ids: Vec<SessionId> = self.notified.iter().copied().collect();
        ids.sort_unstable();

        let started = self
            .bounded("started sessions query", self.source.started_sessions(&ids))
            .await?;

        let mut emitted = 0;
        for session in started {
            if !self.notified.contains(&session.id) {
                continue;
            }
            let agent = session.agent_name();
            tracing::info!(
                session_id = session.id,
                agent = %agent,
                "Chat with ID {} started by agent {}.",
                session.id,
                agent
            );
            let outcomes = self
                .notifier
                .dispatch(&ChatNotification::chat_started(&session))
                .await;
            self.failed_deliveries += failed_outcomes(&outcomes);
            self.notified.remove(&session.id);
            emitted += 1;
        }
        Ok(emitted)
    }

    /// One full cycle: waiting scan, then started scan.
    pub async fn poll_once(&mut self) -> AppResult<ScanReport> {
        self.failed_deliveries = 0;
        let waiting_notified = self.scan_waiting().await?;
        let started_notified = self.scan_started().await?;
        Ok(ScanReport {
            waiting_notified,
            started_notified,
            failed_deliveries: self.failed_deliveries,
            tracked: self.notified.len(),
        })
    }

    pub fn notified(&self) -> &HashSet<SessionId> {
        &self.notified
    }

    pub fn is_notified(&self, id: SessionId) -> bool {
        self.notified.contains(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.notified.len()
    }

    async fn bounded<T>(
        &self,
        what: &str,
        query: impl Future<Output = CoreResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AppError::timeout(format!(
                "{} exceeded {}ms",
                what,
                self.query_timeout.as_millis()
            ))),
        }
    }
}
