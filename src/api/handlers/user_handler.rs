//! User CRUD handlers.
//!
//! Read handlers run on the pooled context; write handlers run their whole
//! body inside `AppState::write`, so the transaction commits only when the
//! unwrapped result is a success.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::response::{self, ApiError};
use crate::api::AppState;
use crate::domain::{CreateUser, UpdateUser, UserResponse};
use crate::services::users;
use crate::types::{Paginated, PaginationParams};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

/// List users
#[utoipa::path(
    get,
    path = "/v1/users/",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let ctx = state.read_context();
    let page = response::unwrap(users::list_users(&ctx, &params).await?)?;

    let page: Paginated<UserResponse> = page.map(UserResponse::from);
    Ok(response::ok(page))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let ctx = state.read_context();
    let user = response::unwrap(users::fetch_user(&ctx, id).await?)?;

    Ok(response::ok(UserResponse::from(user)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/v1/users/",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> Result<Response, ApiError> {
    let user = state
        .write(move |ctx| {
            Box::pin(async move { response::unwrap(users::create_user(&ctx, payload).await?) })
        })
        .await?;

    Ok(response::created(UserResponse::from(user)))
}

/// Update a user
#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> Result<Response, ApiError> {
    let user = state
        .write(move |ctx| {
            Box::pin(async move { response::unwrap(users::update_user(&ctx, id, payload).await?) })
        })
        .await?;

    Ok(response::ok(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state
        .write(move |ctx| {
            Box::pin(async move { response::unwrap(users::remove_user(&ctx, id).await?) })
        })
        .await?;

    Ok(response::no_content())
}
