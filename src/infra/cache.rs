//! Redis cache adapter.
//!
//! Construction is two-phase: `new` only parses the URL and builds the
//! client, `connect` establishes the managed connection. This keeps the
//! adapter constructible without a live server, with the actual I/O tied to
//! process startup.

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, DEFAULT_CACHE_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with a managed, auto-reconnecting connection.
#[derive(Clone)]
pub struct Cache {
    client: Client,
    connection: Option<ConnectionManager>,
    default_ttl: u64,
}

impl Cache {
    /// Create the client from configuration. No I/O happens here.
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::open(config.redis_url())?;
        Ok(Self {
            client,
            connection: None,
            default_ttl: DEFAULT_CACHE_TTL_SECONDS,
        })
    }

    /// Establish the managed connection. Must be called before any operation.
    pub async fn connect(&mut self) -> AppResult<()> {
        let connection = ConnectionManager::new(self.client.clone()).await?;
        self.connection = Some(connection);
        tracing::info!("Connected to the Redis database");
        Ok(())
    }

    /// The underlying client, for connections outside the manager
    /// (the pub/sub listener needs its own).
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn manager(&self) -> AppResult<ConnectionManager> {
        self.connection
            .clone()
            .ok_or_else(|| AppError::internal("Cache used before connect()"))
    }

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.manager()?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Set a value in cache with custom TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.manager()?;
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds).await?;
        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.manager()?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.manager()?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Round-trip a PING to verify connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.manager()?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config() -> Config {
        Config {
            mysql_host: "localhost".to_string(),
            mysql_port: 3306,
            mysql_user: "root".to_string(),
            mysql_password: String::new(),
            mysql_database: "app".to_string(),
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_database: 0,
            migrations_dir: "migrations".to_string(),
        }
    }

    #[test]
    fn new_performs_no_io() {
        // Parsing the URL must succeed without a running server.
        let cache = Cache::new(&test_config());
        assert!(cache.is_ok());
    }

    #[tokio::test]
    async fn operations_before_connect_fail() {
        let cache = Cache::new(&test_config()).unwrap();
        let result = cache.get::<String>("missing").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
