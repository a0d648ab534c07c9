//! Application state and context providers.
//!
//! The adapters are application-lifetime objects constructed once at startup
//! and passed by reference into every request-scoped context; nothing in
//! this layer is a global.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{AccessMode, IsolationLevel, TransactionTrait};

use crate::errors::AppError;
use crate::infra::{Cache, Database};
use crate::services::{Context, PoolContext, TxContext};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    database: Arc<Database>,
    cache: Arc<Cache>,
}

impl AppState {
    pub fn new(database: Arc<Database>, cache: Arc<Cache>) -> Self {
        Self { database, cache }
    }

    /// Context for read-only handlers: operations check connections out of
    /// the pool individually, no transaction is opened.
    pub fn read_context(&self) -> PoolContext<'_> {
        Context::new(self.database.connection(), &self.cache)
    }

    /// Run a closure against a transactional context.
    ///
    /// Opens one transaction for the closure's whole lifetime, commits when
    /// it returns `Ok` and rolls back when it returns `Err` -- exactly one
    /// of the two happens. Domain errors unwrapped inside the closure are
    /// `Err` here, so they roll the transaction back too.
    pub async fn write<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: for<'a> FnOnce(
                TxContext<'a>,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>
            + Send,
        T: Send,
        E: From<AppError> + Send,
    {
        let txn = self
            .database
            .connection()
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = Context::new(&txn, &self.cache);

        match f(ctx).await {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
