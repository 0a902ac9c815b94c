//! In-Memory Session Store
//!
//! A `SessionSource` backed by a map, with the same query semantics as the
//! PostgreSQL adapter. Used by tests and for dry runs against a scripted
//! sequence of session states.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chat_notifier_core::{
    ChatSessionState, CoreError, CoreResult, SessionId, SessionSource, StartedSession,
    WaitingSession,
};

#[derive(Debug, Clone)]
struct SessionRow {
    state: ChatSessionState,
    firstname: Option<String>,
    lastname: Option<String>,
}

/// Map-backed session store.
#[derive(Debug, Default)]
pub struct InMemorySessionSource {
    sessions: Mutex<BTreeMap<SessionId, SessionRow>>,
    failures_remaining: AtomicUsize,
    queries: AtomicUsize,
}

impl InMemorySessionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `id` into the `waiting` state with no agent.
    pub fn set_waiting(&self, id: SessionId) {
        self.upsert(id, ChatSessionState::Waiting, None, None);
    }

    /// Put `id` into the `running` state, handled by the named agent.
    pub fn set_running(&self, id: SessionId, firstname: Option<&str>, lastname: Option<&str>) {
        self.upsert(
            id,
            ChatSessionState::Running,
            firstname.map(str::to_string),
            lastname.map(str::to_string),
        );
    }

    /// Set an arbitrary state, keeping any agent already assigned.
    pub fn set_state(&self, id: SessionId, state: ChatSessionState) {
        let mut sessions = self.lock();
        match sessions.get_mut(&id) {
            Some(row) => row.state = state,
            None => {
                sessions.insert(
                    id,
                    SessionRow {
                        state,
                        firstname: None,
                        lastname: None,
                    },
                );
            }
        }
    }

    /// Make the next `count` queries fail with a data source error.
    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of queries served (including failed ones).
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn upsert(
        &self,
        id: SessionId,
        state: ChatSessionState,
        firstname: Option<String>,
        lastname: Option<String>,
    ) {
        self.lock().insert(
            id,
            SessionRow {
                state,
                firstname,
                lastname,
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<SessionId, SessionRow>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_query(&self) -> CoreResult<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let consumed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            return Err(CoreError::data_source("simulated connection loss"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionSource for InMemorySessionSource {
    async fn waiting_sessions(&self) -> CoreResult<Vec<WaitingSession>> {
        self.begin_query()?;
        Ok(self
            .lock()
            .iter()
            .filter(|(_, row)| row.state == ChatSessionState::Waiting)
            .map(|(id, _)| WaitingSession { id: *id })
            .collect())
    }

    async fn started_sessions(&self, ids: &[SessionId]) -> CoreResult<Vec<StartedSession>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.begin_query()?;
        let sessions = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| sessions.get(id).map(|row| (*id, row)))
            .filter(|(_, row)| row.state == ChatSessionState::Running)
            .map(|(id, row)| StartedSession {
                id,
                firstname: row.firstname.clone(),
                lastname: row.lastname.clone(),
            })
            .collect())
    }
}
