//! Application services layer - Use cases and business logic.
//!
//! Service functions take a request-scoped `Context` and return either a
//! domain value or a typed error variant. They never touch HTTP types
//! beyond status codes, and never convert domain errors into responses --
//! that happens once, at the API boundary.

mod context;
mod error;
pub mod health;
pub mod users;

pub use context::{Context, PoolContext, TxContext};
pub use error::{ServiceError, ServiceResult};
pub use health::HealthError;
pub use users::UserError;
