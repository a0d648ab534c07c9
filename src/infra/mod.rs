//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and repositories
//! - Redis cache and pub/sub
//! - SQL file migrations

pub mod cache;
pub mod db;
pub mod migrator;
pub mod pubsub;
pub mod repositories;

pub use cache::Cache;
pub use db::Database;
pub use migrator::Migrator;
pub use pubsub::{PubSubHandler, PubSubRouter};
pub use repositories::UserRepository;
