//! User repository.
//!
//! Generic over the connection so the same queries run against the pooled
//! connection and an open transaction. Instances are constructed fresh by
//! `Context` accessors and discarded after use.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::AppResult;
use crate::types::PaginationParams;

pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Find user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(User::from))
    }

    /// Find user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await?;
        Ok(result.map(User::from))
    }

    /// List users ordered by id, one page at a time. Returns the page and
    /// the total row count.
    pub async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let paginator = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .paginate(self.conn, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    /// Insert a new user row.
    pub async fn insert(&self, email: String, name: String) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            email: Set(email),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(self.conn).await?;
        Ok(User::from(model))
    }

    /// Update user fields. Returns None when the row does not exist.
    pub async fn update(&self, id: i64, name: Option<String>) -> AppResult<Option<User>> {
        let Some(existing) = UserEntity::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.conn).await?;
        Ok(Some(User::from(model)))
    }

    /// Delete a user row. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
