//! Repository layer - Data access abstraction
//!
//! Repositories translate typed method calls into parameterized queries
//! for one domain entity each.

pub mod entities;
mod user_repository;

pub use user_repository::UserRepository;
