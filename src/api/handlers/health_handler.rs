//! Health check handler.

use axum::{extract::State, response::Response, routing::get, Router};

use crate::api::response::{self, ApiError};
use crate::api::AppState;
use crate::services::health::{self, HealthReport};

/// Create health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Service health check
#[utoipa::path(
    get,
    path = "/v1/health/",
    tag = "Health",
    responses(
        (status = 200, description = "All adapters healthy", body = HealthReport),
        (status = 503, description = "Database or cache unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Response, ApiError> {
    let ctx = state.read_context();
    let report = response::unwrap(health::check_health(&ctx).await?)?;

    Ok(response::ok(report))
}
