// Zammad Chat Notifier - process entry point

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zammad_chat_notifier::state::NotifierContext;
use zammad_chat_notifier::storage::config::load_from_env;

#[tokio::main]
async fn main() {
    init_logging();

    let config = match load_from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let context = match NotifierContext::initialize(config).await {
        Ok(context) => context,
        Err(err) => {
            error!(error = %err, "Failed to initialize notifier");
            std::process::exit(1);
        }
    };

    info!("Started Zammad Telegram Notifier");
    context.announce_startup().await;

    let result = context.run_until(shutdown_signal()).await;
    context.shutdown().await;

    match result {
        Ok(summary) => info!(
            cycles = summary.cycles,
            waiting = summary.waiting_notified,
            started = summary.started_notified,
            failed_deliveries = summary.failed_deliveries,
            "Poll loop finished"
        ),
        Err(err) => {
            error!(error = %err, "Poll loop aborted");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
