//! API response helpers and the error-unwrap boundary.
//!
//! `unwrap` is the single conversion point between the services' tagged
//! success-or-error unions and HTTP failures. Everything below the boundary
//! returns errors as values; everything above speaks `ApiError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::services::ServiceError;

/// Success envelope for all v1 responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    pub data: T,
}

/// 200 response in the v1 envelope.
pub fn ok<T: Serialize>(data: T) -> Response {
    reply(StatusCode::OK, data)
}

/// 201 response in the v1 envelope.
pub fn created<T: Serialize>(data: T) -> Response {
    reply(StatusCode::CREATED, data)
}

/// 204 response, no body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn reply<T: Serialize>(status: StatusCode, data: T) -> Response {
    (
        status,
        Json(Envelope {
            status: status.as_u16(),
            data,
        }),
    )
        .into_response()
}

/// Boundary error: either a domain error unwrapped from a service result,
/// or an infrastructure failure that bubbled up.
#[derive(Debug)]
pub enum ApiError {
    Service {
        service: &'static str,
        code: &'static str,
        status: StatusCode,
    },
    Infra(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Infra(err)
    }
}

/// Uniform body for domain error responses.
#[derive(Debug, Serialize)]
struct ServiceErrorBody {
    service: &'static str,
    code: &'static str,
    status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service {
                service,
                code,
                status,
            } => (
                status,
                Json(ServiceErrorBody {
                    service,
                    code,
                    status: status.as_u16(),
                }),
            )
                .into_response(),
            ApiError::Infra(err) => err.into_response(),
        }
    }
}

/// Unwrap a service outcome: pass the success payload through unchanged,
/// or convert the error variant into a typed HTTP failure.
pub fn unwrap<T, E: ServiceError>(outcome: Result<T, E>) -> Result<T, ApiError> {
    outcome.map_err(|err| {
        tracing::debug!(
            error = %err.resolve_name(),
            status = err.status().as_u16(),
            "API call was interrupted by a service error"
        );
        ApiError::Service {
            service: err.service(),
            code: err.code(),
            status: err.status(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::UserError;

    #[test]
    fn unwrap_passes_success_through_unchanged() {
        let outcome: Result<i32, UserError> = Ok(7);
        assert_eq!(unwrap(outcome).unwrap(), 7);
    }

    #[test]
    fn unwrap_maps_variant_to_typed_failure() {
        let outcome: Result<i32, UserError> = Err(UserError::NotFound);
        match unwrap(outcome).unwrap_err() {
            ApiError::Service {
                service,
                code,
                status,
            } => {
                assert_eq!(service, "users");
                assert_eq!(code, "not_found");
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn service_error_body_shape() {
        let body = ServiceErrorBody {
            service: "users",
            code: "not_found",
            status: 404,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"service": "users", "code": "not_found", "status": 404})
        );
    }

    #[test]
    fn envelope_shape() {
        let json = serde_json::to_value(Envelope {
            status: 200,
            data: "pong",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": 200, "data": "pong"}));
    }
}
