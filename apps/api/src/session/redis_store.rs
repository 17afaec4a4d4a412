use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::info;
use uuid::Uuid;

use crate::session::{Session, SessionError, SessionStore};

const KEY_PREFIX: &str = "sudarshan:session";

/// Redis-backed store. Each session is one JSON string with a sliding TTL
/// refreshed on every write.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected");
        Ok(Self { conn, ttl_secs })
    }
}

fn session_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}:{id}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(session_key(id))
            .query_async(&mut conn)
            .await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(session_key(session.id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs.max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
