//! Service Scaffold - A CRUD HTTP service template
//!
//! Axum over MySQL (SeaORM) and Redis, organized around request-scoped
//! contexts and typed service errors.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities
//! - **services**: Business logic over request-scoped contexts
//! - **infra**: Infrastructure concerns (database, cache, pub/sub, migrations)
//! - **logging**: Subscriber setup and the JSON record format
//! - **api**: HTTP handlers, middleware, routes, and the error-unwrap boundary
//! - **types**: Shared types (pagination)
//! - **errors**: Infrastructure error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Apply migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
