//! Store metadata flags kept in `db_meta`.

use sqlx::SqlitePool;

use crate::{Database, Result};

/// Set once the legacy per-game record files have been imported.
pub const LEGACY_MIGRATION_KEY: &str = "gacha_migrated_v1";

/// Read a boolean flag. Absent or any value other than "1" reads as false.
pub async fn get_flag(pool: &SqlitePool, key: &str) -> Result<bool> {
    let value = sqlx::query_scalar::<_, String>(
        r#"
        SELECT value FROM db_meta
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value.as_deref() == Some("1"))
}

/// Write a boolean flag as "1" or "0".
pub async fn set_flag(db: &Database, key: &str, value: bool) -> Result<()> {
    let writer = db.writer().await;
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO db_meta (key, value)
        VALUES (?, ?)
        "#,
    )
    .bind(key)
    .bind(if value { "1" } else { "0" })
    .execute(writer.pool())
    .await?;

    Ok(())
}

pub async fn is_legacy_migrated(pool: &SqlitePool) -> Result<bool> {
    get_flag(pool, LEGACY_MIGRATION_KEY).await
}

pub async fn mark_legacy_migrated(db: &Database) -> Result<()> {
    set_flag(db, LEGACY_MIGRATION_KEY, true).await
}
