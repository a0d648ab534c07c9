//! Typed domain errors for service functions.
//!
//! Expected failures (not-found, conflict) are values in a closed per-domain
//! enumeration, not exceptions: a service returns either its success payload
//! or one variant. The API boundary's `unwrap` is the only place that turns
//! a variant into an HTTP failure.

use axum::http::StatusCode;

use crate::errors::AppError;

/// Capabilities every domain error enumeration provides.
pub trait ServiceError: std::fmt::Debug + Send + Sync {
    /// The owning service, used as the error namespace.
    fn service(&self) -> &'static str;

    /// Machine-readable variant name in snake_case.
    fn code(&self) -> &'static str;

    /// The HTTP status this variant maps to.
    fn status(&self) -> StatusCode;

    /// Fully qualified error name, `<service>.<code>`.
    fn resolve_name(&self) -> String {
        format!("{}.{}", self.service(), self.code())
    }
}

/// Return type of service functions.
///
/// The outer `Result` carries infrastructure failures and propagates with
/// `?`; the inner one is the domain tagged union: exactly one of success
/// payload or declared error variant.
pub type ServiceResult<T, E> = Result<Result<T, E>, AppError>;
