use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::session::{Session, SessionError, SessionStore};

/// Process-local store. Sessions idle longer than `ttl` are treated as gone
/// and swept on the next write.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX).min(i64::MAX / 1000)),
        }
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.updated_at > self.ttl
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&id)
            .filter(|s| !self.is_expired(s))
            .cloned())
    }

    async fn put(&self, session: &Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !self.is_expired(s));
        sessions.insert(session.id, session.clone());
        Ok(())
    }
}
