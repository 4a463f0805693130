//! One-time import of the per-game legacy record files.
//!
//! Before the unified store, each game's standalone release kept one JSON file
//! per account under `<legacy root>/<SRTools|ZenlessTools>/GachaRecords`. The
//! import is best effort: unreadable files are skipped, and the store is marked
//! migrated after a single pass regardless, since a malformed file would fail
//! the same way on every retry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::game::Game;
use crate::normalize::GachaPayload;
use crate::{account, config, meta, record};
use crate::{Database, Result};

/// Counts from a completed import pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub records_written: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The flag was already set; nothing was read or written.
    AlreadyMigrated,
    Migrated(MigrationReport),
}

/// Imports legacy record files into the store exactly once.
#[derive(Debug, Clone)]
pub struct LegacyMigrator {
    legacy_root: PathBuf,
}

impl LegacyMigrator {
    pub fn new(legacy_root: impl Into<PathBuf>) -> Self {
        Self {
            legacy_root: legacy_root.into(),
        }
    }

    /// Run the import unless the store is already marked migrated.
    ///
    /// Only failures reading or writing the flag are returned; per-file
    /// failures are logged and counted.
    pub async fn run_once(&self, db: &Database) -> Result<MigrationOutcome> {
        if meta::is_legacy_migrated(db.pool()).await? {
            debug!("Legacy records already migrated");
            return Ok(MigrationOutcome::AlreadyMigrated);
        }

        let mut report = MigrationReport::default();
        for game in Game::ALL {
            self.migrate_game(db, game, &mut report).await;
        }

        meta::mark_legacy_migrated(db).await?;

        info!(
            files_imported = report.files_imported,
            files_skipped = report.files_skipped,
            records_written = report.records_written,
            "Legacy record migration complete"
        );
        Ok(MigrationOutcome::Migrated(report))
    }

    async fn migrate_game(&self, db: &Database, game: Game, report: &mut MigrationReport) {
        let dir = config::legacy_records_dir(&self.legacy_root, game);
        let files = match list_record_files(&dir).await {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%game, dir = %dir.display(), "No legacy record folder");
                return;
            }
            Err(e) => {
                warn!(%game, dir = %dir.display(), error = %e, "Cannot list legacy record folder");
                return;
            }
        };

        for file in files {
            match import_file(db, game, &file).await {
                Ok(written) => {
                    report.files_imported += 1;
                    report.records_written += written;
                }
                Err(e) => {
                    warn!(%game, file = %file.display(), error = %e, "Skipping legacy record file");
                    report.files_skipped += 1;
                }
            }
        }
    }
}

/// Register the file's account, then write its records.
///
/// A failed account write leaves the file's records unwritten.
async fn import_file(db: &Database, game: Game, path: &Path) -> Result<u64> {
    let json = tokio::fs::read_to_string(path).await?;
    let payload = GachaPayload::from_json(game, &json)?;

    if let Some(uid) = payload.uid() {
        account::upsert_account(db, game, uid, None, true).await?;
    }

    record::sync_payload(db, &payload).await
}

/// `*.json` files directly inside `dir`, sorted by name.
async fn list_record_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
