use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::session::state::Session;

/// Sessions untouched for longer than this are dropped.
pub const DEFAULT_IDLE_TTL_MINUTES: i64 = 60;

/// Process-memory session registry. Nothing is persisted; a session lives
/// until it is deleted, sits idle past the TTL, or the process exits.
///
/// The lock is only held for state transitions, never across a model call.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_IDLE_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    /// Registers a fresh IDLE session. Idle sessions are swept first.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let cutoff = Utc::now() - self.idle_ttl;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, existing| existing.updated_at > cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, "Evicted idle sessions");
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Applies `f` to the session under the write lock. `None` if the session
    /// does not exist.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(f)
    }
}
