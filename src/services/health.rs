//! Health service.
//!
//! The one place where adapter errors are inspected instead of propagated:
//! a failing ping is an expected answer here, not a failure of the check
//! itself.

use axum::http::StatusCode;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::context::Context;
use super::error::{ServiceError, ServiceResult};

/// Expected failures of the health service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HealthError {
    #[error("service unhealthy")]
    Unhealthy,
}

impl ServiceError for HealthError {
    fn service(&self) -> &'static str {
        "health"
    }

    fn code(&self) -> &'static str {
        match self {
            HealthError::Unhealthy => "service_unhealthy",
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Per-adapter health report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub database: &'static str,
    pub cache: &'static str,
}

/// Ping both adapters; unhealthy if either fails.
pub async fn check_health<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
) -> ServiceResult<HealthReport, HealthError> {
    let backend = ctx.mysql().get_database_backend();
    let database_ok = match ctx
        .mysql()
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let cache_ok = match ctx.redis().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            false
        }
    };

    if database_ok && cache_ok {
        Ok(Ok(HealthReport {
            database: "healthy",
            cache: "healthy",
        }))
    } else {
        Ok(Err(HealthError::Unhealthy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_maps_to_503() {
        assert_eq!(
            HealthError::Unhealthy.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HealthError::Unhealthy.resolve_name(),
            "health.service_unhealthy"
        );
    }
}
