//! Migrate command - Database migration management.

use crate::cli::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Migrator};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let database = Database::connect(&config).await?;
    let migrator = Migrator::new(&config.migrations_dir);

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            let applied = migrator.up(database.connection()).await?;
            tracing::info!(applied, "Migrations completed");
        }
        MigrateAction::Down { steps } => {
            tracing::info!(steps, "Reverting migrations...");
            let reverted = migrator.down(database.connection(), steps).await?;
            tracing::info!(reverted, "Rollback completed");
        }
        MigrateAction::Status => {
            let status = migrator.status(database.connection()).await?;
            for (name, applied) in status {
                let state = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, state);
            }
        }
    }

    Ok(())
}
