//! SQLite persistence and reconciliation layer for gacha draw history.
//!
//! This crate ingests draw records for Honkai: Star Rail and Zenless Zone Zero
//! from live sync payloads and legacy per-account JSON files, stores them in a
//! single SQLite file keyed by `(game, uid, pool_id, record_id)`, and serves
//! them back as per-pool views ordered for pity and streak computation.
//!
//! # Startup
//!
//! The store moves through `Uninitialized → SchemaReady → MigrationChecked →
//! Operational` exactly once per process. Only the operational [`GachaStore`]
//! exposes reads and writes.
//!
//! ```no_run
//! use gacha_store::{Game, GachaStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::from_env()?;
//!     let store = GachaStore::open(&config).await?;
//!
//!     for uid in store.list_uids(Game::ZenlessZoneZero).await? {
//!         let view = store.aggregated_view(Game::ZenlessZoneZero, &uid).await?;
//!         println!("{uid}: {} draws", view.record_count());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod game;
pub mod lifecycle;
pub mod meta;
pub mod migration;
pub mod models;
pub mod normalize;
pub mod pools;
pub mod record;
pub mod schema;
pub mod settings;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use error::{Result, StoreError};
pub use game::Game;
pub use lifecycle::{MigrationChecked, SchemaReady, Uninitialized};
pub use migration::{LegacyMigrator, MigrationOutcome, MigrationReport};
pub use models::{Account, AggregatedView, GachaPool, GachaRecord, RecordEntry};
pub use normalize::{GachaPayload, PoolBatch, StarRailPayload, ZenlessPayload};
pub use store::GachaStore;

use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::{Mutex, MutexGuard};

/// Database connection wrapper.
///
/// Clones share the connection pool and the single writer lock.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    writer: Arc<Mutex<()>>,
}

impl Database {
    /// Default pool size for reader connections.
    const DEFAULT_POOL_SIZE: u32 = 8;

    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path);
        Self::connect_with(options, Self::DEFAULT_POOL_SIZE).await
    }

    async fn connect_with(options: SqliteConnectOptions, pool_size: u32) -> Result<Self> {
        let options = options.create_if_missing(true).foreign_keys(true);
        let filename = options.get_filename().to_path_buf();

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            filename = %filename.display(),
            pool_size,
            "Connected to gacha store"
        );

        Ok(Self {
            pool,
            writer: Arc::new(Mutex::new(())),
        })
    }

    /// Create any missing tables and indexes.
    pub async fn initialize(&self) -> Result<()> {
        schema::initialize_schema(&self.pool).await?;
        tracing::debug!("Schema ready");
        Ok(())
    }

    /// Get a reference to the connection pool. Use it for reads only.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire the store's single writer slot.
    ///
    /// Every mutation holds the returned guard from `begin` until commit.
    pub async fn writer(&self) -> Writer<'_> {
        Writer {
            pool: &self.pool,
            _guard: self.writer.lock().await,
        }
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Exclusive write access to the store.
pub struct Writer<'a> {
    pool: &'a SqlitePool,
    _guard: MutexGuard<'a, ()>,
}

impl Writer<'_> {
    /// Start a transaction while holding the writer slot.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Pool for single-statement writes that need no transaction.
    pub fn pool(&self) -> &SqlitePool {
        self.pool
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Database;
    use crate::game::Game;

    /// A fresh, initialized store in its own temporary directory.
    pub async fn test_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).await.unwrap();
        db.initialize().await.unwrap();
        (dir, db)
    }

    pub async fn count_rows(db: &Database) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM gacha_records")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    /// Stored records of one account.
    pub async fn count_records(db: &Database, game: Game, uid: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM gacha_records WHERE game = ? AND uid = ?",
        )
        .bind(game.as_str())
        .bind(uid)
        .fetch_one(db.pool())
        .await
        .unwrap()
    }

    /// User tables present in the store, by name.
    pub async fn table_names(db: &Database) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap()
    }
}
