//! Transition Detector Integration Tests
//!
//! Runs the detector and dispatcher end to end against an in-memory session
//! store, with both channels delivering to a local capture server.

use std::sync::Arc;
use std::time::Duration;

use zammad_chat_notifier::services::detector::{ScanReport, TransitionDetector};
use zammad_chat_notifier::services::notify::NotifyService;
use zammad_chat_notifier::state::NotifierContext;
use zammad_chat_notifier::storage::InMemorySessionSource;

use crate::support::{config_for, CaptureServer};

fn webhook_texts(server: &CaptureServer) -> Vec<String> {
    server
        .requests_to("/hook")
        .iter()
        .map(|r| r.form()["text"].clone())
        .collect()
}

#[tokio::test]
async fn test_waiting_then_taken_by_agent() {
    let server = CaptureServer::start().await;
    let (service, _) = NotifyService::from_config(&config_for(&server, &["42"])).unwrap();
    let source = Arc::new(InMemorySessionSource::new());
    let mut detector = TransitionDetector::new(source.clone(), Arc::new(service));

    source.set_waiting(42);
    let first = detector.poll_once().await.unwrap();
    assert_eq!(
        first,
        ScanReport {
            waiting_notified: 1,
            started_notified: 0,
            failed_deliveries: 0,
            tracked: 1
        }
    );

    source.set_running(42, Some("Jane"), Some("Doe"));
    let second = detector.poll_once().await.unwrap();
    assert_eq!(second.started_notified, 1);
    assert_eq!(detector.tracked_count(), 0);

    assert_eq!(
        webhook_texts(&server),
        vec![
            "There is a waiting chat with ID 42.".to_string(),
            "Chat with ID 42 has been taken by Jane Doe.".to_string(),
        ]
    );
    let telegram: Vec<String> = server
        .requests_to("/send_message")
        .iter()
        .map(|r| r.form()["text"].clone())
        .collect();
    assert_eq!(telegram, webhook_texts(&server));
}

#[tokio::test]
async fn test_several_sessions_each_alerted_once() {
    let server = CaptureServer::start().await;
    let (service, _) = NotifyService::from_config(&config_for(&server, &["42"])).unwrap();
    let source = Arc::new(InMemorySessionSource::new());
    let mut detector = TransitionDetector::new(source.clone(), Arc::new(service));

    source.set_waiting(1);
    source.set_waiting(2);
    detector.poll_once().await.unwrap();
    source.set_waiting(3);
    source.set_running(1, Some("Ann"), None);
    detector.poll_once().await.unwrap();
    detector.poll_once().await.unwrap();

    let mut texts = webhook_texts(&server);
    texts.sort();
    assert_eq!(
        texts,
        vec![
            "Chat with ID 1 has been taken by Ann.".to_string(),
            "There is a waiting chat with ID 1.".to_string(),
            "There is a waiting chat with ID 2.".to_string(),
            "There is a waiting chat with ID 3.".to_string(),
        ]
    );
    assert!(detector.is_notified(2));
    assert!(detector.is_notified(3));
    assert!(!detector.is_notified(1));
}

#[tokio::test]
async fn test_delivery_failures_do_not_affect_tracking() {
    let server = CaptureServer::start_with(|_, _, _| (500, "down".to_string())).await;
    let (service, _) = NotifyService::from_config(&config_for(&server, &["42"])).unwrap();
    let source = Arc::new(InMemorySessionSource::new());
    let mut detector = TransitionDetector::new(source.clone(), Arc::new(service));

    source.set_waiting(8);
    let first = detector.poll_once().await.unwrap();
    let second = detector.poll_once().await.unwrap();
    assert_eq!(first.failed_deliveries, 2);
    assert_eq!(second.failed_deliveries, 0);

    // fire-and-forget: one attempt per channel, never retried
    assert!(detector.is_notified(8));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_context_poll_loop_recovers_from_transient_failure() {
    let server = CaptureServer::start().await;
    let mut config = config_for(&server, &["42"]);
    config.poll.interval_ms = 20;
    config.retry.base_delay_ms = 10;
    config.retry.max_delay_ms = 10;
    let source = Arc::new(InMemorySessionSource::new());
    source.set_waiting(42);
    source.fail_next(2);
    let context = NotifierContext::with_source(config, source.clone()).unwrap();

    let summary = context
        .run_until(tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    assert_eq!(summary.failed_cycles, 2);
    assert_eq!(summary.waiting_notified, 1);
    assert_eq!(webhook_texts(&server), vec!["There is a waiting chat with ID 42.".to_string()]);
}

#[tokio::test]
async fn test_context_poll_loop_gives_up_after_retry_budget() {
    let server = CaptureServer::start().await;
    let mut config = config_for(&server, &["42"]);
    config.retry.max_attempts = 2;
    config.retry.base_delay_ms = 5;
    config.retry.max_delay_ms = 5;
    let source = Arc::new(InMemorySessionSource::new());
    source.fail_next(10);
    let context = NotifierContext::with_source(config, source.clone()).unwrap();

    let result = context.run_until(std::future::pending::<()>()).await;

    assert!(result.is_err());
    assert_eq!(source.query_count(), 2);
    assert!(server.requests().is_empty());
}
