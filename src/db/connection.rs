/// Database connection management with connection pooling
///
/// The persisted history index is a small SQLite file behind a sqlx pool.

use crate::error::{CmdwerkError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum number of database connections in the pool
const MAX_CONNECTIONS: u32 = 5;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl Database {
    /// Create or open the index database at `db_path`
    ///
    /// Creates the parent directory and the file when missing. Used by sync.
    ///
    /// # Examples
    /// ```no_run
    /// use cmdwerk_lib::db::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new("/home/me/.cmdwerk/history.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .disable_statement_logging();

        Self::connect(options, db_path, MAX_CONNECTIONS).await
    }

    /// Open an index database that must already exist
    ///
    /// Never creates tables; a file without the index tables counts as missing.
    ///
    /// # Returns
    /// * `Err(CmdwerkError::IndexNotFound)` - No index at `db_path`, run sync first
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if !db_path.is_file() {
            return Err(CmdwerkError::IndexNotFound(db_path));
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(false)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        let db = Self {
            pool: Arc::new(pool),
            db_path,
        };

        if !db.has_index_tables().await? {
            db.close().await;
            return Err(CmdwerkError::IndexNotFound(db.db_path));
        }

        Ok(db)
    }

    /// Create a test database in memory
    ///
    /// One connection only, every in-memory connection is its own database.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, PathBuf::from(":memory:"), 1).await
    }

    async fn connect(
        options: SqliteConnectOptions,
        db_path: PathBuf,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
            db_path,
        };

        db.initialize_schema().await?;

        Ok(db)
    }

    /// True when every table a sync writes is present
    async fn has_index_tables(&self) -> Result<bool> {
        let found: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('prefix_candidates', 'first_tokens', 'sync_runs')",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(found.0 == 3)
    }

    /// Create all tables and indexes if they don't exist
    async fn initialize_schema(&self) -> Result<()> {
        let schema = include_str!("../../database/schema.sql");

        // sqlx runs one statement per execute
        for statement in schema.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(self.pool.as_ref()).await?;
            }
        }

        Ok(())
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Row counts for the status report
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let key_count: (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT prefix_key) FROM prefix_candidates")
                .fetch_one(self.pool.as_ref())
                .await?;

        let candidate_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prefix_candidates")
            .fetch_one(self.pool.as_ref())
            .await?;

        let first_token_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM first_tokens")
            .fetch_one(self.pool.as_ref())
            .await?;

        let sync_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sync_runs")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(DatabaseStats {
            total_keys: key_count.0,
            total_candidates: candidate_count.0,
            total_first_tokens: first_token_count.0,
            total_sync_runs: sync_count.0,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub total_keys: i64,
    pub total_candidates: i64,
    pub total_first_tokens: i64,
    pub total_sync_runs: i64,
    pub pool_size: u32,
    pub idle_connections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_creation() {
        let db = Database::new_test().await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    async fn test_database_stats_empty() {
        let db = Database::new_test().await.unwrap();
        let stats = db.stats().await.unwrap();

        assert_eq!(stats.total_keys, 0);
        assert_eq!(stats.total_candidates, 0);
        assert_eq!(stats.total_first_tokens, 0);
        assert_eq!(stats.total_sync_runs, 0);
    }

    #[tokio::test]
    async fn test_new_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("history.db");

        let db = Database::new(&path).await.unwrap();
        assert!(path.is_file());
        assert_eq!(db.path(), path.as_path());
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_missing_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("history.db");

        match Database::open(&path).await {
            Err(CmdwerkError::IndexNotFound(p)) => assert_eq!(p, path),
            Err(e) => panic!("Expected IndexNotFound, got {e}"),
            Ok(_) => panic!("Expected IndexNotFound, got a database"),
        }
    }

    #[tokio::test]
    async fn test_open_empty_file_is_missing_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("history.db");
        std::fs::write(&path, b"").unwrap();

        match Database::open(&path).await {
            Err(CmdwerkError::IndexNotFound(p)) => assert_eq!(p, path),
            Err(e) => panic!("Expected IndexNotFound, got {e}"),
            Ok(_) => panic!("Expected IndexNotFound, got a database"),
        }
    }

    #[tokio::test]
    async fn test_open_unrelated_database_is_missing_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("history.db");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
        sqlx::query("CREATE TABLE notes (body TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        assert!(matches!(
            Database::open(&path).await,
            Err(CmdwerkError::IndexNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_open_existing_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("history.db");

        Database::new(&path).await.unwrap().close().await;
        let db = Database::open(&path).await.unwrap();
        let stats = db.stats().await.unwrap();
        assert_eq!(stats.total_keys, 0);
        db.close().await;
    }
}
