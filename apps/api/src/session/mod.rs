//! Per-session state: uploaded document text, generated summary, chat transcript.
//!
//! State is ephemeral and last write wins. The store is pluggable:
//! `InMemorySessionStore` by default, `RedisSessionStore` when `REDIS_URL` is set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod handlers;
pub mod memory;
pub mod redis_store;
pub mod workflow;

pub use memory::InMemorySessionStore;
pub use redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub document_text: String,
    pub summary: String,
    pub chat_history: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document_text: String::new(),
            summary: String::new(),
            chat_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Resets document, summary, and transcript. Identity is kept.
    pub fn clear(&mut self) {
        self.document_text.clear();
        self.summary.clear();
        self.chat_history.clear();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session persistence. Implementations only need last-write-wins semantics.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, SessionError>;

    async fn put(&self, session: &Session) -> Result<(), SessionError>;

    /// Loads a session or fails with `NotFound`.
    async fn require(&self, id: Uuid) -> Result<Session, SessionError> {
        self.get(id).await?.ok_or(SessionError::NotFound(id))
    }
}
