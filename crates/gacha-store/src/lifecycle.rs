//! Startup sequence of the store.
//!
//! ```text
//! Uninitialized ──initialize──▶ SchemaReady ──check_migration──▶ MigrationChecked
//!                                                                      │
//!                                                              into_operational
//!                                                                      ▼
//!                                                                 GachaStore
//! ```
//!
//! Each state is its own type, so reads and writes cannot be issued before the
//! schema exists and the legacy import has been checked.

use tracing::info;

use crate::config::StoreConfig;
use crate::migration::{LegacyMigrator, MigrationOutcome};
use crate::store::GachaStore;
use crate::{Database, Result};

/// Nothing opened yet.
#[derive(Debug, Clone)]
pub struct Uninitialized {
    config: StoreConfig,
}

impl Uninitialized {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create the folder tree, open the database file and ensure the schema.
    ///
    /// Any failure here leaves the application without a usable store.
    pub async fn initialize(self) -> Result<SchemaReady> {
        self.config.ensure_folders()?;

        let path = self.config.database_path();
        let db = Database::open(&path).await?;
        db.initialize().await?;

        info!(path = %path.display(), "Gacha store initialized");
        Ok(SchemaReady {
            config: self.config,
            db,
        })
    }
}

/// Schema exists; legacy import not yet checked.
#[derive(Debug, Clone)]
pub struct SchemaReady {
    config: StoreConfig,
    db: Database,
}

impl SchemaReady {
    /// Run the legacy import from the configured legacy root if still pending.
    pub async fn check_legacy_migration(self) -> Result<MigrationChecked> {
        let migrator = LegacyMigrator::new(self.config.legacy_root.clone());
        self.check_migration(&migrator).await
    }

    pub async fn check_migration(self, migrator: &LegacyMigrator) -> Result<MigrationChecked> {
        let outcome = migrator.run_once(&self.db).await?;
        Ok(MigrationChecked {
            config: self.config,
            db: self.db,
            outcome,
        })
    }
}

/// Legacy import done or skipped; ready to hand out.
#[derive(Debug, Clone)]
pub struct MigrationChecked {
    config: StoreConfig,
    db: Database,
    outcome: MigrationOutcome,
}

impl MigrationChecked {
    pub fn outcome(&self) -> &MigrationOutcome {
        &self.outcome
    }

    pub fn into_operational(self) -> GachaStore {
        GachaStore::new(self.db, self.config)
    }
}
