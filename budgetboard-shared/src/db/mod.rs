/// Persistence layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded migration runner
/// - `store`: the [`Store`](store::Store) trait every service depends on
/// - `postgres`: sqlx-backed [`PgStore`](postgres::PgStore)
/// - `memory`: in-process [`MemoryStore`](memory::MemoryStore)
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use budgetboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use budgetboard_shared::db::postgres::PgStore;
/// use budgetboard_shared::db::store::Store;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::new(std::env::var("DATABASE_URL")?, 10);
///     let pool = create_pool(config).await?;
///
///     let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
///     store.ping().await?;
///     Ok(())
/// }
/// ```

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod store;
