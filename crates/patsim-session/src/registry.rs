use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

/// Live sessions by id. Nothing is persisted.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) -> Uuid {
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Look a session up and mark it active. A session that is mid-request
    /// is already active and is left as is.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::UnknownSession(id))?;
        if let Ok(mut session) = handle.try_lock() {
            session.touch();
        }
        Ok(handle)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!(session_id = %id, "session ended"))
            .ok_or(SessionError::UnknownSession(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop every session idle for at least `idle_ttl`. Returns how many
    /// were evicted.
    pub async fn evict_idle(&self, idle_ttl: Duration) -> usize {
        self.evict_idle_at(jiff::Timestamp::now(), idle_ttl).await
    }

    /// [`evict_idle`](Self::evict_idle) against an explicit clock reading.
    /// Sessions locked by an in-flight request are never evicted.
    pub async fn evict_idle_at(&self, now: jiff::Timestamp, idle_ttl: Duration) -> usize {
        let ttl_ms = i64::try_from(idle_ttl.as_millis()).unwrap_or(i64::MAX);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) => {
                let idle_ms = now
                    .as_millisecond()
                    .saturating_sub(session.last_active().as_millisecond());
                let keep = idle_ms < ttl_ms;
                if !keep {
                    info!(session_id = %id, idle_ms, "evicting idle session");
                }
                keep
            }
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        debug!(evicted, remaining = sessions.len(), "idle session sweep");
        evicted
    }

    /// Take the session for the duration of one request.
    ///
    /// Overlapping requests for the same session are rejected with
    /// [`SessionError::Busy`] rather than queued.
    pub fn lock_exclusive(handle: &SessionHandle) -> Result<OwnedMutexGuard<Session>, SessionError> {
        handle.clone().try_lock_owned().map_err(|_| SessionError::Busy)
    }
}
