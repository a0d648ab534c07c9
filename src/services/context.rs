//! Request-scoped service context.
//!
//! A context bundles the adapter handles a service function needs for one
//! request: a database handle (pooled connection or open transaction) and
//! the cache client. Repository accessors construct a fresh instance per
//! call, bound to whichever handle the context holds.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

use crate::infra::{Cache, UserRepository};

/// Context generic over the database handle.
///
/// Lives for one request; the transactional variant's commit or rollback is
/// driven by the boundary that created it (`AppState::write`).
pub struct Context<'a, C> {
    conn: &'a C,
    cache: &'a Cache,
}

/// Read-only variant: every operation checks a connection out of the pool.
pub type PoolContext<'a> = Context<'a, DatabaseConnection>;

/// Write variant: every operation participates in the one open transaction.
pub type TxContext<'a> = Context<'a, DatabaseTransaction>;

impl<'a, C: ConnectionTrait> Context<'a, C> {
    pub fn new(conn: &'a C, cache: &'a Cache) -> Self {
        Self { conn, cache }
    }

    /// The MySQL handle this context holds.
    pub fn mysql(&self) -> &'a C {
        self.conn
    }

    /// The Redis cache adapter.
    pub fn redis(&self) -> &'a Cache {
        self.cache
    }

    /// User repository bound to this context's database handle.
    /// A new instance per call; repositories are never cached.
    pub fn users(&self) -> UserRepository<'a, C> {
        UserRepository::new(self.conn)
    }
}
