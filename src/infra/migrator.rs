//! File-based SQL migration runner.
//!
//! Migrations are paired files named `{unix_timestamp}_{description}.up.sql`
//! and `.down.sql`, applied in ascending timestamp order. Applied versions
//! are recorded in a `schema_migrations` table. A failing step halts the run
//! immediately; nothing is rolled back automatically.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::errors::{AppError, AppResult};

const TRACKING_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (\
     version BIGINT NOT NULL PRIMARY KEY,\
     name VARCHAR(255) NOT NULL,\
     applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\
     )";

/// One discovered migration: a timestamped up/down file pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub up: PathBuf,
    pub down: PathBuf,
}

impl Migration {
    /// `{version}_{description}`, the recorded migration name.
    pub fn name(&self) -> String {
        format!("{}_{}", self.version, self.description)
    }
}

/// Which side of a migration pair a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Parse `{unix_timestamp}_{description}.(up|down).sql` into its parts.
fn parse_file_name(name: &str) -> Option<(i64, String, Direction)> {
    let (stem, direction) = if let Some(stem) = name.strip_suffix(".up.sql") {
        (stem, Direction::Up)
    } else if let Some(stem) = name.strip_suffix(".down.sql") {
        (stem, Direction::Down)
    } else {
        return None;
    };

    let (timestamp, description) = stem.split_once('_')?;
    let version: i64 = timestamp.parse().ok()?;
    if description.is_empty() {
        return None;
    }

    Some((version, description.to_string(), direction))
}

/// Split a migration file into individual statements.
///
/// Strips `--` line comments and splits on `;`. Good enough for DDL
/// scaffolding; statements containing literal semicolons need to be split
/// into separate migration files.
fn split_statements(sql: &str) -> Vec<String> {
    sql.lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Discovers and applies migration pairs from a directory.
pub struct Migrator {
    dir: PathBuf,
}

impl Migrator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Discover all migration pairs, sorted ascending by timestamp.
    ///
    /// Unpaired files and duplicate timestamps are errors: a half-written
    /// pair should fail loudly before anything is applied.
    pub fn discover(&self) -> AppResult<Vec<Migration>> {
        let mut ups: Vec<(i64, String, PathBuf)> = Vec::new();
        let mut downs: Vec<(i64, String, PathBuf)> = Vec::new();

        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            AppError::migration(format!("Cannot read {}: {}", self.dir.display(), e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| AppError::migration(e.to_string()))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match parse_file_name(name) {
                Some((version, description, Direction::Up)) => {
                    ups.push((version, description, entry.path()));
                }
                Some((version, description, Direction::Down)) => {
                    downs.push((version, description, entry.path()));
                }
                None => {
                    tracing::debug!(file = %name, "Ignoring non-migration file");
                }
            }
        }

        let mut migrations = Vec::with_capacity(ups.len());
        for (version, description, up) in ups {
            let down = downs
                .iter()
                .find(|(v, d, _)| *v == version && *d == description)
                .map(|(_, _, path)| path.clone())
                .ok_or_else(|| {
                    AppError::migration(format!(
                        "Missing down migration for {}_{}",
                        version, description
                    ))
                })?;
            migrations.push(Migration {
                version,
                description,
                up,
                down,
            });
        }

        for (version, description, _) in &downs {
            if !migrations
                .iter()
                .any(|m| m.version == *version && m.description == *description)
            {
                return Err(AppError::migration(format!(
                    "Missing up migration for {}_{}",
                    version, description
                )));
            }
        }

        migrations.sort_by_key(|m| m.version);
        for pair in migrations.windows(2) {
            if pair[0].version == pair[1].version {
                return Err(AppError::migration(format!(
                    "Duplicate migration timestamp {}",
                    pair[0].version
                )));
            }
        }

        Ok(migrations)
    }

    async fn ensure_tracking_table(&self, db: &DatabaseConnection) -> AppResult<()> {
        db.execute_unprepared(TRACKING_TABLE_DDL).await?;
        Ok(())
    }

    /// Versions already recorded as applied.
    pub async fn applied(&self, db: &DatabaseConnection) -> AppResult<BTreeSet<i64>> {
        self.ensure_tracking_table(db).await?;
        let rows = db
            .query_all(Statement::from_string(
                db.get_database_backend(),
                "SELECT version FROM schema_migrations ORDER BY version".to_string(),
            ))
            .await?;

        let mut versions = BTreeSet::new();
        for row in rows {
            versions.insert(row.try_get::<i64>("", "version")?);
        }
        Ok(versions)
    }

    /// Apply all pending migrations in ascending order.
    ///
    /// Returns the number applied. Halts at the first failing step and
    /// reports it; previously applied steps stay applied.
    pub async fn up(&self, db: &DatabaseConnection) -> AppResult<usize> {
        let applied = self.applied(db).await?;
        let mut count = 0;

        for migration in self.discover()? {
            if applied.contains(&migration.version) {
                continue;
            }

            tracing::info!(migration = %migration.name(), "Applying migration");
            self.run_file(db, &migration.up).await.map_err(|e| {
                AppError::migration(format!("{} failed: {}", migration.name(), e))
            })?;
            self.record(db, &migration, true).await?;
            count += 1;
        }

        Ok(count)
    }

    /// Revert the most recently applied migrations, newest first.
    pub async fn down(&self, db: &DatabaseConnection, steps: u32) -> AppResult<usize> {
        let applied = self.applied(db).await?;
        let migrations = self.discover()?;
        let mut count = 0;

        for migration in migrations.iter().rev() {
            if count >= steps as usize {
                break;
            }
            if !applied.contains(&migration.version) {
                continue;
            }

            tracing::info!(migration = %migration.name(), "Reverting migration");
            self.run_file(db, &migration.down).await.map_err(|e| {
                AppError::migration(format!("{} revert failed: {}", migration.name(), e))
            })?;
            self.record(db, migration, false).await?;
            count += 1;
        }

        Ok(count)
    }

    /// Each known migration with its applied state.
    pub async fn status(&self, db: &DatabaseConnection) -> AppResult<Vec<(String, bool)>> {
        let applied = self.applied(db).await?;
        Ok(self
            .discover()?
            .iter()
            .map(|m| (m.name(), applied.contains(&m.version)))
            .collect())
    }

    async fn run_file(&self, db: &DatabaseConnection, path: &Path) -> AppResult<()> {
        let sql = std::fs::read_to_string(path)
            .map_err(|e| AppError::migration(format!("Cannot read {}: {}", path.display(), e)))?;

        for statement in split_statements(&sql) {
            db.execute_unprepared(&statement).await?;
        }
        Ok(())
    }

    async fn record(
        &self,
        db: &DatabaseConnection,
        migration: &Migration,
        applied: bool,
    ) -> AppResult<()> {
        let statement = if applied {
            Statement::from_sql_and_values(
                db.get_database_backend(),
                "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
                [migration.version.into(), migration.name().into()],
            )
        } else {
            Statement::from_sql_and_values(
                db.get_database_backend(),
                "DELETE FROM schema_migrations WHERE version = ?",
                [migration.version.into()],
            )
        };
        db.execute(statement).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_up_and_down_names() {
        assert_eq!(
            parse_file_name("1700000000_create_users.up.sql"),
            Some((1700000000, "create_users".to_string(), Direction::Up))
        );
        assert_eq!(
            parse_file_name("1700000000_create_users.down.sql"),
            Some((1700000000, "create_users".to_string(), Direction::Down))
        );
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(parse_file_name("create_users.up.sql"), None);
        assert_eq!(parse_file_name("1700000000.up.sql"), None);
        assert_eq!(parse_file_name("1700000000_create_users.sql"), None);
        assert_eq!(parse_file_name("notes.txt"), None);
    }

    #[test]
    fn splits_statements_and_strips_comments() {
        let sql = "-- create the table\nCREATE TABLE t (id INT);\n\nINSERT INTO t VALUES (1);\n";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert!(statements[1].starts_with("INSERT"));
    }

    #[test]
    fn discovery_sorts_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "1700000300_add_index.up.sql",
            "1700000300_add_index.down.sql",
            "1700000100_create_users.up.sql",
            "1700000100_create_users.down.sql",
        ] {
            fs::write(dir.path().join(name), "SELECT 1;").unwrap();
        }

        let migrations = Migrator::new(dir.path()).discover().unwrap();
        assert_eq!(migrations.len(), 2);
        assert_eq!(migrations[0].version, 1700000100);
        assert_eq!(migrations[1].version, 1700000300);
        assert_eq!(migrations[0].name(), "1700000100_create_users");
    }

    #[test]
    fn discovery_rejects_unpaired_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1700000100_create_users.up.sql"), "SELECT 1;").unwrap();

        let result = Migrator::new(dir.path()).discover();
        assert!(matches!(result, Err(AppError::Migration(_))));
    }

    #[test]
    fn discovery_rejects_unpaired_down() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("1700000100_create_users.down.sql"),
            "SELECT 1;",
        )
        .unwrap();

        let result = Migrator::new(dir.path()).discover();
        assert!(matches!(result, Err(AppError::Migration(_))));
    }
}
