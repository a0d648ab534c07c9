//! User service tests against a mocked database connection.

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use std::sync::Arc;

use service_scaffold::domain::{CreateUser, UpdateUser};
use service_scaffold::infra::repositories::entities::user;
use service_scaffold::infra::{Cache, Database};
use service_scaffold::services::{users, Context, UserError};
use service_scaffold::{AppError, AppState, Config};

fn test_config() -> Config {
    Config {
        mysql_host: "localhost".to_string(),
        mysql_port: 3306,
        mysql_user: "root".to_string(),
        mysql_password: String::new(),
        mysql_database: "app".to_string(),
        redis_host: "localhost".to_string(),
        redis_port: 6379,
        redis_database: 0,
        migrations_dir: "migrations".to_string(),
    }
}

fn user_model(id: i64, email: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        email: email.to_string(),
        name: "Test User".to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn fetch_user_returns_payload() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![user_model(42, "user@example.com")]])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let outcome = users::fetch_user(&ctx, 42).await.unwrap();
    let user = outcome.expect("expected success");
    assert_eq!(user.id, 42);
    assert_eq!(user.email, "user@example.com");
}

#[tokio::test]
async fn fetch_user_missing_returns_not_found_variant() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let outcome = users::fetch_user(&ctx, 42).await.unwrap();
    assert_eq!(outcome.unwrap_err(), UserError::NotFound);
}

#[tokio::test]
async fn create_user_inserts_when_email_is_free() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        // find_by_email finds nothing, then the insert refetches the row
        .append_query_results([
            Vec::<user::Model>::new(),
            vec![user_model(1, "new@example.com")],
        ])
        .append_exec_results([MockExecResult {
            last_insert_id: 1,
            rows_affected: 1,
        }])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let payload = CreateUser {
        email: "new@example.com".to_string(),
        name: "Test User".to_string(),
    };
    let outcome = users::create_user(&ctx, payload).await.unwrap();
    assert_eq!(outcome.unwrap().id, 1);
}

#[tokio::test]
async fn create_user_duplicate_email_returns_conflict_variant() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([vec![user_model(1, "taken@example.com")]])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let payload = CreateUser {
        email: "taken@example.com".to_string(),
        name: "Test User".to_string(),
    };
    let outcome = users::create_user(&ctx, payload).await.unwrap();
    assert_eq!(outcome.unwrap_err(), UserError::AlreadyExists);
}

#[tokio::test]
async fn update_user_changes_name() {
    let mut updated = user_model(7, "user@example.com");
    updated.name = "Renamed".to_string();

    let db = MockDatabase::new(DatabaseBackend::MySql)
        // find_by_id, then the update refetches the row
        .append_query_results([vec![user_model(7, "user@example.com")], vec![updated]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let payload = UpdateUser {
        name: Some("Renamed".to_string()),
    };
    let outcome = users::update_user(&ctx, 7, payload).await.unwrap();
    assert_eq!(outcome.unwrap().name, "Renamed");
}

#[tokio::test]
async fn update_user_missing_returns_not_found_variant() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let payload = UpdateUser { name: None };
    let outcome = users::update_user(&ctx, 7, payload).await.unwrap();
    assert_eq!(outcome.unwrap_err(), UserError::NotFound);
}

#[tokio::test]
async fn remove_user_deletes_existing_row() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let outcome = users::remove_user(&ctx, 7).await.unwrap();
    assert!(outcome.is_ok());
}

/// Render the transaction log of a connection shared with `AppState`. The
/// statements are matched in quoted debug form so `READ COMMITTED` in the
/// isolation setup cannot be mistaken for a `COMMIT`.
fn transaction_log(state: AppState, database: Arc<Database>) -> String {
    drop(state);
    let database = Arc::try_unwrap(database)
        .ok()
        .expect("state held the only other reference");
    format!("{:?}", database.into_connection().into_transaction_log())
}

#[tokio::test]
async fn write_commits_exactly_once_on_success() {
    let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
    let database = Arc::new(Database::from_connection(db));
    let state = AppState::new(
        database.clone(),
        Arc::new(Cache::new(&test_config()).unwrap()),
    );

    let value: Result<i32, AppError> = state.write(|_ctx| Box::pin(async { Ok(5) })).await;
    assert_eq!(value.unwrap(), 5);

    let log = transaction_log(state, database);
    assert_eq!(log.matches("\"COMMIT\"").count(), 1);
    assert_eq!(log.matches("\"ROLLBACK\"").count(), 0);
}

#[tokio::test]
async fn write_rolls_back_exactly_once_on_error() {
    let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
    let database = Arc::new(Database::from_connection(db));
    let state = AppState::new(
        database.clone(),
        Arc::new(Cache::new(&test_config()).unwrap()),
    );

    let value: Result<i32, AppError> = state
        .write(|_ctx| Box::pin(async { Err(AppError::internal("refused")) }))
        .await;
    assert!(matches!(value, Err(AppError::Internal(_))));

    let log = transaction_log(state, database);
    assert_eq!(log.matches("\"ROLLBACK\"").count(), 1);
    assert_eq!(log.matches("\"COMMIT\"").count(), 0);
}

#[tokio::test]
async fn remove_user_missing_returns_not_found_variant() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let database = Database::from_connection(db);
    let cache = Cache::new(&test_config()).unwrap();
    let ctx = Context::new(database.connection(), &cache);

    let outcome = users::remove_user(&ctx, 7).await.unwrap();
    assert_eq!(outcome.unwrap_err(), UserError::NotFound);
}
