// Cache module
// Optional Redis connection, probed by the health endpoint

use redis::{aio::ConnectionManager, Client};
use tracing::{debug, warn};

/// Seconds the health probe key lives
const PROBE_TTL_SECONDS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

/// Redis client with a reconnecting connection manager. Keys are
/// namespaced by `prefix`.
#[derive(Clone)]
pub struct CacheClient {
    conn: ConnectionManager,
    prefix: String,
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClient")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl CacheClient {
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            prefix: prefix.into(),
        })
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    /// Write a short-lived probe key; false when Redis is unreachable
    pub async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        let key = self.key("health");

        let result: Result<(), redis::RedisError> = redis::cmd("SET")
            .arg(&key)
            .arg("ok")
            .arg("EX")
            .arg(PROBE_TTL_SECONDS)
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => {
                debug!(cache.key = %key, "Cache probe succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "Cache probe failed");
                false
            }
        }
    }
}
