//! Poll Loop
//!
//! Drives the transition detector at a fixed interval. Failed cycles are
//! retried with exponential backoff; the loop gives up after
//! `RetryPolicy::max_attempts` consecutive failures.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::models::settings::RetryPolicy;
use crate::services::detector::{ScanReport, TransitionDetector};
use crate::utils::error::AppResult;

/// Totals accumulated over a loop run, returned on clean shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub waiting_notified: u64,
    pub started_notified: u64,
    pub failed_deliveries: u64,
}

impl PollSummary {
    fn record(&mut self, report: &ScanReport) {
        self.cycles += 1;
        self.waiting_notified += report.waiting_notified as u64;
        self.started_notified += report.started_notified as u64;
        self.failed_deliveries += report.failed_deliveries as u64;
    }
}

pub struct PollLoop {
    detector: TransitionDetector,
    interval: Duration,
    retry: RetryPolicy,
}

impl PollLoop {
    pub fn new(detector: TransitionDetector, interval: Duration, retry: RetryPolicy) -> Self {
        Self {
            detector,
            interval,
            retry,
        }
    }

    pub fn detector(&self) -> &TransitionDetector {
        &self.detector
    }

    /// Poll until `shutdown` resolves or the retry budget is spent.
    ///
    /// Shutdown is only observed between cycles, so a cycle that has started
    /// always finishes its sends and set updates.
    pub async fn run_until<F>(&mut self, shutdown: F) -> AppResult<PollSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut summary = PollSummary::default();
        let mut consecutive_failures: u32 = 0;

        loop {
            let delay = match self.detector.poll_once().await {
                Ok(report) => {
                    if consecutive_failures > 0 {
                        tracing::info!(
                            attempts = consecutive_failures,
                            "Session store reachable again"
                        );
                    }
                    consecutive_failures = 0;
                    summary.record(&report);
                    if report.failed_deliveries > 0 {
                        tracing::warn!(
                            failed = report.failed_deliveries,
                            "Some notifications could not be delivered this cycle"
                        );
                    }
                    if report.waiting_notified > 0 || report.started_notified > 0 {
                        tracing::debug!(
                            waiting = report.waiting_notified,
                            started = report.started_notified,
                            tracked = report.tracked,
                            "Poll cycle complete"
                        );
                    }
                    self.interval
                }
                Err(e) => {
                    consecutive_failures += 1;
                    summary.failed_cycles += 1;
                    if consecutive_failures >= self.retry.max_attempts {
                        tracing::error!(
                            attempts = consecutive_failures,
                            error = %e,
                            "Poll cycle failed, retry budget exhausted"
                        );
                        return Err(e);
                    }
                    let backoff = self.retry.delay_for_attempt(consecutive_failures - 1);
                    tracing::warn!(
                        attempt = consecutive_failures,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Poll cycle failed, retrying"
                    );
                    backoff
                }
            };

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(
                        cycles = summary.cycles,
                        tracked = self.detector.tracked_count(),
                        "Shutdown requested, stopping poll loop"
                    );
                    return Ok(summary);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
