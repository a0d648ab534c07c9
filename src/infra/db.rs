//! Database connection management.

use sea_orm::{Database as SeaDatabase, DatabaseConnection};

use crate::config::Config;
use crate::errors::AppResult;

/// Wrapper around the SeaORM connection pool.
///
/// Constructed once at startup and shared by reference with every
/// request-scoped context.
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the MySQL connection pool.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let connection = SeaDatabase::connect(config.database_url()).await?;
        tracing::info!(
            host = %config.mysql_host,
            database = %config.mysql_database,
            "Connected to the MySQL database"
        );
        Ok(Self { connection })
    }

    /// Wrap an existing connection (used by tests to inject mocks).
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Recover the owned connection (used by tests to inspect it).
    pub fn into_connection(self) -> DatabaseConnection {
        self.connection
    }
}
