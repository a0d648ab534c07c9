//! Application route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{health_routes, user_routes};
use super::middleware::trace_requests;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .nest("/health", health_routes())
        .nest("/users", user_routes());

    Router::new()
        .nest("/v1", v1)
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        // Outermost layer: every downstream log record carries the request uuid
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}
