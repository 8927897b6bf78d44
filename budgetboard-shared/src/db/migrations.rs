/// Embedded schema migrations
///
/// The SQL files under `budgetboard-shared/migrations/` are compiled into the
/// binary. The initial migration creates every table, the category
/// uniqueness index, and seeds category types, currencies and group
/// subjects.

use sqlx::{
    migrate::{MigrateDatabase, Migrator},
    postgres::PgPool,
    Postgres,
};
use tracing::{debug, info, warn};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied migrations compared to the embedded set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,
    pub available_migrations: usize,
    pub latest_version: Option<i64>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.applied_migrations >= self.available_migrations
    }
}

/// Applies pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(available = MIGRATOR.iter().count(), "Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        warn!(error = %e, "Migration failed");
        e
    })?;

    info!("Database migrations completed");
    Ok(())
}

/// Reads `_sqlx_migrations`; a missing table means nothing was applied
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let available_migrations = MIGRATOR.iter().count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            available_migrations,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: count.max(0) as usize,
        available_migrations,
        latest_version,
    })
}

/// Creates the database named in the URL when it is missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
