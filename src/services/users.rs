//! User service - business logic for the users domain.

use sea_orm::ConnectionTrait;
use thiserror::Error;

use super::context::Context;
use super::error::{ServiceError, ServiceResult};
use crate::domain::{CreateUser, UpdateUser, User};
use crate::types::{Paginated, PaginationParams};
use axum::http::StatusCode;

/// Expected failures of the users service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("user already exists")]
    AlreadyExists,
}

impl ServiceError for UserError {
    fn service(&self) -> &'static str {
        "users"
    }

    fn code(&self) -> &'static str {
        match self {
            UserError::NotFound => "not_found",
            UserError::AlreadyExists => "already_exists",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::AlreadyExists => StatusCode::CONFLICT,
        }
    }
}

/// Fetch a single user by id.
pub async fn fetch_user<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
    id: i64,
) -> ServiceResult<User, UserError> {
    match ctx.users().find_by_id(id).await? {
        Some(user) => Ok(Ok(user)),
        None => Ok(Err(UserError::NotFound)),
    }
}

/// List users, one page at a time.
pub async fn list_users<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
    params: &PaginationParams,
) -> ServiceResult<Paginated<User>, UserError> {
    let (users, total) = ctx.users().list(params).await?;
    Ok(Ok(Paginated::new(users, params, total)))
}

/// Create a user. Fails with `AlreadyExists` when the email is taken.
///
/// The uniqueness check races with concurrent inserts; the unique key on
/// `email` is the backstop, surfacing as a database error and a rollback.
pub async fn create_user<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
    payload: CreateUser,
) -> ServiceResult<User, UserError> {
    let users = ctx.users();

    if users.find_by_email(&payload.email).await?.is_some() {
        return Ok(Err(UserError::AlreadyExists));
    }

    let user = users.insert(payload.email, payload.name).await?;
    tracing::debug!(user_id = user.id, "Created user");
    Ok(Ok(user))
}

/// Update a user's mutable fields.
pub async fn update_user<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
    id: i64,
    payload: UpdateUser,
) -> ServiceResult<User, UserError> {
    match ctx.users().update(id, payload.name).await? {
        Some(user) => Ok(Ok(user)),
        None => Ok(Err(UserError::NotFound)),
    }
}

/// Delete a user by id.
pub async fn remove_user<C: ConnectionTrait>(
    ctx: &Context<'_, C>,
    id: i64,
) -> ServiceResult<(), UserError> {
    if ctx.users().delete(id).await? {
        tracing::debug!(user_id = id, "Deleted user");
        Ok(Ok(()))
    } else {
        Ok(Err(UserError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_statuses() {
        assert_eq!(UserError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(UserError::AlreadyExists.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn resolve_name_is_namespaced() {
        assert_eq!(UserError::NotFound.resolve_name(), "users.not_found");
        assert_eq!(
            UserError::AlreadyExists.resolve_name(),
            "users.already_exists"
        );
    }
}
