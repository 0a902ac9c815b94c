//! PostgreSQL Session Store
//!
//! Read-only adapter over the Zammad `chat_sessions` and `users` tables.
//! A single connection is opened at startup and held for the process
//! lifetime; if the driver reports it closed, the next query reconnects.

use std::time::Duration;

use async_trait::async_trait;
use chat_notifier_core::{
    ChatSessionState, CoreError, CoreResult, SessionId, SessionSource, StartedSession,
    WaitingSession,
};
use tokio::sync::{Mutex, MutexGuard};
use tokio_postgres::{Client, NoTls, Row};

use crate::models::settings::DatabaseSettings;
use crate::utils::error::AppResult;

const APPLICATION_NAME: &str = "zammad-chat-notifier";

/// Sessions currently waiting for an agent.
pub const WAITING_SESSIONS_SQL: &str = "SELECT id::bigint FROM chat_sessions WHERE state = $1";

/// Tracked sessions that are now running, with the agent who took them.
pub const STARTED_SESSIONS_SQL: &str = "SELECT cs.id::bigint, u.firstname, u.lastname \
     FROM chat_sessions cs \
     JOIN users u ON cs.user_id = u.id \
     WHERE cs.state = $1 AND cs.id = ANY($2::bigint[])";

/// Session source backed by the Zammad PostgreSQL database.
pub struct PostgresSessionSource {
    settings: DatabaseSettings,
    connect_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl PostgresSessionSource {
    /// Open the connection. Failure here is fatal to startup.
    pub async fn connect(settings: DatabaseSettings, connect_timeout: Duration) -> AppResult<Self> {
        let client = open_client(&settings, connect_timeout).await?;
        tracing::info!(
            host = %settings.host,
            port = settings.port,
            dbname = %settings.dbname,
            "Connected to Zammad database"
        );
        Ok(Self {
            settings,
            connect_timeout,
            client: Mutex::new(Some(client)),
        })
    }

    /// Drop the connection. Subsequent queries reconnect.
    pub async fn close(&self) {
        let mut guard = self.client.lock().await;
        if guard.take().is_some() {
            tracing::debug!("Closed Zammad database connection");
        }
    }

    /// Lock the client, reconnecting first if the connection is gone.
    async fn live_client(&self) -> CoreResult<MutexGuard<'_, Option<Client>>> {
        let mut guard = self.client.lock().await;
        let closed = guard.as_ref().map(Client::is_closed).unwrap_or(true);
        if closed {
            tracing::warn!(host = %self.settings.host, "Database connection lost, reconnecting");
            let client = open_client(&self.settings, self.connect_timeout)
                .await
                .map_err(|e| CoreError::data_source(format!("Failed to reconnect: {}", e)))?;
            *guard = Some(client);
        }
        Ok(guard)
    }
}

#[async_trait]
impl SessionSource for PostgresSessionSource {
    async fn waiting_sessions(&self) -> CoreResult<Vec<WaitingSession>> {
        let guard = self.live_client().await?;
        let client = guard
            .as_ref()
            .ok_or_else(|| CoreError::internal("Database client missing after reconnect"))?;

        let state = ChatSessionState::Waiting;
        let rows = client
            .query(WAITING_SESSIONS_SQL, &[&state.as_str()])
            .await
            .map_err(|e| CoreError::data_source(format!("Waiting-chat query failed: {}", e)))?;

        rows.iter().map(waiting_from_row).collect()
    }

    async fn started_sessions(&self, ids: &[SessionId]) -> CoreResult<Vec<StartedSession>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let guard = self.live_client().await?;
        let client = guard
            .as_ref()
            .ok_or_else(|| CoreError::internal("Database client missing after reconnect"))?;

        let state = ChatSessionState::Running;
        let rows = client
            .query(STARTED_SESSIONS_SQL, &[&state.as_str(), &ids])
            .await
            .map_err(|e| CoreError::data_source(format!("Started-chat query failed: {}", e)))?;

        rows.iter().map(started_from_row).collect()
    }
}

async fn open_client(
    settings: &DatabaseSettings,
    connect_timeout: Duration,
) -> Result<Client, tokio_postgres::Error> {
    let mut config = tokio_postgres::Config::new();
    config
        .host(&settings.host)
        .port(settings.port)
        .user(&settings.user)
        .dbname(&settings.dbname)
        .application_name(APPLICATION_NAME)
        .connect_timeout(connect_timeout);
    if let Some(ref password) = settings.password {
        config.password(password);
    }

    let (client, connection) = config.connect(NoTls).await?;

    // The connection future drives the socket; it resolves when the server
    // goes away, after which `Client::is_closed` reports true.
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "Database connection terminated");
        }
    });

    Ok(client)
}

fn waiting_from_row(row: &Row) -> CoreResult<WaitingSession> {
    let id: i64 = row
        .try_get(0)
        .map_err(|e| CoreError::parse(format!("Invalid chat session id: {}", e)))?;
    Ok(WaitingSession { id })
}

fn started_from_row(row: &Row) -> CoreResult<StartedSession> {
    let id: i64 = row
        .try_get(0)
        .map_err(|e| CoreError::parse(format!("Invalid chat session id: {}", e)))?;
    let firstname: Option<String> = row
        .try_get(1)
        .map_err(|e| CoreError::parse(format!("Invalid agent firstname: {}", e)))?;
    let lastname: Option<String> = row
        .try_get(2)
        .map_err(|e| CoreError::parse(format!("Invalid agent lastname: {}", e)))?;
    Ok(StartedSession {
        id,
        firstname,
        lastname,
    })
}
