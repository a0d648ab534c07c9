//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - Middleware (request tracing)
//! - Custom extractors
//! - Route definitions
//! - The error-unwrap boundary

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use response::ApiError;
pub use routes::create_router;
pub use state::AppState;
