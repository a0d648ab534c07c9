//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::domain::{CreateUser, UpdateUser, UserResponse};
use crate::services::health::HealthReport;

/// OpenAPI documentation for the service scaffold
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Scaffold",
        version = "0.1.0",
        description = "CRUD service scaffold with Axum, SeaORM (MySQL) and Redis",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        health_handler::health_check,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserResponse,
            CreateUser,
            UpdateUser,
            HealthReport,
        )
    ),
    tags(
        (name = "Health", description = "Service health checks"),
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;
