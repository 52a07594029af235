//! Storage layer for FeedDeck.
//!
//! This module owns the connection pool, the schema bootstrap, the
//! user-scoped entry query builder and the repositories used by the
//! scheduler and the web API.

mod category;
mod condition;
mod enclosure;
mod entry;
mod entry_query;
mod entry_query_builder;
mod feed;
mod job;
mod schema;
mod sorting;
mod sql;
mod user;

pub use category::CategoryRepository;
pub use enclosure::EnclosureRepository;
pub use entry::EntryRepository;
pub use entry_query::EntryQuery;
pub use entry_query_builder::EntryQueryBuilder;
pub use feed::FeedRepository;
pub use job::jobs_statement;
pub use sql::{resolve_timezone, Dialect, Operator, QueryArg, Statement};
pub use user::UserRepository;

use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::{FeedDeckError, Result};

/// Database pool of the backend selected at compile time.
#[cfg(feature = "postgres")]
pub type DbPool = sqlx::PgPool;
/// Database row of the backend selected at compile time.
#[cfg(feature = "postgres")]
pub type DbRow = sqlx::postgres::PgRow;
#[cfg(feature = "postgres")]
pub(crate) type Db = sqlx::Postgres;

/// Database pool of the backend selected at compile time.
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type DbPool = sqlx::SqlitePool;
/// Database row of the backend selected at compile time.
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type DbRow = sqlx::sqlite::SqliteRow;
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub(crate) type Db = sqlx::Sqlite;

/// Storage handle shared by the scheduler and the request handlers.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: DbPool,
}

impl Storage {
    /// Connect to the configured database and bootstrap the schema.
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use std::str::FromStr;

        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        info!("Opening database at {}", config.url);

        if let Some(path) = sqlite_file_path(&config.url) {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| FeedDeckError::DatabaseConnection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| FeedDeckError::DatabaseConnection(e.to_string()))?;

        Self::with_pool(pool).await
    }

    /// Connect to the configured database and bootstrap the schema.
    #[cfg(feature = "postgres")]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use sqlx::postgres::PgPoolOptions;

        info!("Connecting to PostgreSQL database");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| FeedDeckError::DatabaseConnection(e.to_string()))?;

        Self::with_pool(pool).await
    }

    /// Open an in-memory database for testing.
    ///
    /// A single connection that never expires keeps the database alive for
    /// the lifetime of the pool.
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    pub async fn open_in_memory() -> Result<Self> {
        use std::str::FromStr;

        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| FeedDeckError::DatabaseConnection(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| FeedDeckError::DatabaseConnection(e.to_string()))?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating missing tables.
    pub async fn with_pool(pool: DbPool) -> Result<Self> {
        let storage = Self { pool };
        storage.bootstrap().await?;
        Ok(storage)
    }

    async fn bootstrap(&self) -> Result<()> {
        let statements = schema::statements(self.dialect());
        debug!("Bootstrapping schema ({} statements)", statements.len());

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| FeedDeckError::Database(format!("unable to create schema: {e}")))?;
        }
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// SQL dialect of the connected backend.
    pub fn dialect(&self) -> Dialect {
        Dialect::CURRENT
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Start an entry query scoped to `user_id`, converting dates to `timezone`.
    pub fn new_entry_query_builder(&self, user_id: i64, timezone: &str) -> EntryQueryBuilder<'_> {
        EntryQueryBuilder::new(self, user_id, timezone)
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(&self.pool)
    }

    pub fn feeds(&self) -> FeedRepository<'_> {
        FeedRepository::new(&self.pool)
    }

    pub fn entries(&self) -> EntryRepository<'_> {
        EntryRepository::new(&self.pool)
    }

    pub fn enclosures(&self) -> EnclosureRepository<'_> {
        EnclosureRepository::new(&self.pool)
    }
}

/// File path of a `sqlite://` URL, or `None` for in-memory databases.
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

#[cfg(all(test, feature = "sqlite", not(feature = "postgres")))]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/feeddeck.db"),
            Some("data/feeddeck.db")
        );
        assert_eq!(
            sqlite_file_path("sqlite://data/feeddeck.db?mode=rwc"),
            Some("data/feeddeck.db")
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/feeddeck"), None);
    }

    #[tokio::test]
    async fn test_open_in_memory_creates_tables() {
        let storage = Storage::open_in_memory().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(storage.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        assert_eq!(
            names,
            vec!["categories", "enclosures", "entries", "feed_icons", "feeds", "users"]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_is_repeatable() {
        let storage = Storage::open_in_memory().await.unwrap();
        storage.bootstrap().await.unwrap();
        assert_eq!(storage.dialect(), Dialect::Sqlite);
    }

    #[tokio::test]
    async fn test_connect_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("feeddeck.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
        };

        let storage = Storage::connect(&config).await.unwrap();
        assert!(path.exists());
        storage.close().await;
    }
}
