//! On-disk schema. Every statement is idempotent and runs on each start.

use sqlx::SqlitePool;

use crate::Result;

const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS db_meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        game TEXT NOT NULL,
        uid TEXT NOT NULL,
        name TEXT,
        is_legacy INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT,
        PRIMARY KEY (game, uid)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gacha_records (
        game TEXT NOT NULL,
        uid TEXT NOT NULL,
        pool_id INTEGER NOT NULL,
        pool_type TEXT,
        gacha_id TEXT,
        item_id TEXT,
        count INTEGER,
        time TEXT,
        name TEXT,
        item_type TEXT,
        rank_type TEXT,
        lang TEXT,
        record_id TEXT NOT NULL,
        PRIMARY KEY (game, uid, pool_id, record_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_gacha_uid ON gacha_records(uid)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_gacha_game_uid ON gacha_records(game, uid)
    "#,
];

/// Create any missing tables and indexes.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
