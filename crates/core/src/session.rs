//! Chat Session Model
//!
//! Row types read from the Zammad `chat_sessions` / `users` tables and the
//! `SessionSource` trait the transition detector polls. The notifier never
//! writes to the store; every operation here is a read.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Fallback display name when a running session's agent has no name parts.
pub const UNKNOWN_AGENT_NAME: &str = "an unknown agent";

/// Opaque session key (`chat_sessions.id`).
pub type SessionId = i64;

/// Lifecycle state of a chat session as stored in `chat_sessions.state`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatSessionState {
    /// Awaiting a human agent
    Waiting,
    /// Being handled by an agent
    Running,
    /// Any other state (e.g. `closed`); ignored by the notifier
    Other(String),
}

impl ChatSessionState {
    /// Column value used in queries.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for ChatSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A session currently in the `waiting` state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitingSession {
    pub id: SessionId,
}

/// A session now `running`, joined with the agent who picked it up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartedSession {
    pub id: SessionId,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl StartedSession {
    /// Agent display name: non-empty name parts joined by a single space.
    pub fn agent_name(&self) -> String {
        let parts: Vec<&str> = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            UNKNOWN_AGENT_NAME.to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Read-only access to the authoritative session store.
///
/// Implementations must not cache: every call reflects the store at the
/// moment of the query.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// All sessions currently in the `waiting` state.
    async fn waiting_sessions(&self) -> CoreResult<Vec<WaitingSession>>;

    /// Among `ids`, the sessions now `running`, with their agent's name.
    ///
    /// Callers pass the ids they are tracking; an empty slice yields an
    /// empty result.
    async fn started_sessions(&self, ids: &[SessionId]) -> CoreResult<Vec<StartedSession>>;
}
