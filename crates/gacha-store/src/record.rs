//! Gacha record writes and per-account views.

use std::collections::BTreeMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::game::Game;
use crate::models::{AggregatedView, GachaPool, GachaRecord, RecordEntry};
use crate::normalize::GachaPayload;
use crate::pools;
use crate::{Database, Result};

/// Insert or replace every entry of one pool in a single transaction.
///
/// Rows are keyed by `(game, uid, pool_id, record_id)`; an existing row with
/// the same key is replaced wholesale. A blank uid writes nothing. Returns the
/// number of entries written.
pub async fn upsert_records(
    db: &Database,
    game: Game,
    uid: &str,
    pool_id: i64,
    pool_type: &str,
    entries: &[RecordEntry],
) -> Result<u64> {
    if uid.trim().is_empty() {
        return Ok(0);
    }

    let writer = db.writer().await;
    let mut tx = writer.begin().await?;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO gacha_records
                (game, uid, pool_id, pool_type, gacha_id, item_id, count, time,
                 name, item_type, rank_type, lang, record_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(game.as_str())
        .bind(uid)
        .bind(pool_id)
        .bind(pool_type)
        .bind(&entry.gacha_id)
        .bind(&entry.item_id)
        .bind(entry.count)
        .bind(&entry.time)
        .bind(&entry.name)
        .bind(&entry.item_type)
        .bind(&entry.rank_type)
        .bind(&entry.lang)
        .bind(&entry.record_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(%game, uid, pool_id, count = entries.len(), "Upserted gacha records");
    Ok(entries.len() as u64)
}

/// Normalize a producer payload and upsert each of its pools.
///
/// Each pool is its own transaction. Returns the number of rows written.
pub async fn sync_payload(db: &Database, payload: &GachaPayload) -> Result<u64> {
    let mut written = 0;
    for batch in payload.normalize() {
        written += upsert_records(
            db,
            batch.game,
            &batch.uid,
            batch.pool_id,
            &batch.pool_type,
            &batch.entries,
        )
        .await?;
    }
    Ok(written)
}

/// Delete every record of one account of one game.
///
/// A blank uid deletes nothing. Returns the number of rows removed.
pub async fn delete_by_game_uid(db: &Database, game: Game, uid: &str) -> Result<u64> {
    if uid.trim().is_empty() {
        return Ok(0);
    }

    let writer = db.writer().await;
    let result = sqlx::query(
        r#"
        DELETE FROM gacha_records
        WHERE game = ? AND uid = ?
        "#,
    )
    .bind(game.as_str())
    .bind(uid)
    .execute(writer.pool())
    .await?;

    debug!(%game, uid, removed = result.rows_affected(), "Deleted gacha records");
    Ok(result.rows_affected())
}

/// Distinct account ids with records for a game, alphabetically.
pub async fn list_uids(pool: &SqlitePool, game: Game) -> Result<Vec<String>> {
    let uids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT uid
        FROM gacha_records
        WHERE game = ?
        ORDER BY uid
        "#,
    )
    .bind(game.as_str())
    .fetch_all(pool)
    .await?;

    Ok(uids)
}

/// Raw stored rows of one account, in key order.
pub async fn fetch_records(pool: &SqlitePool, game: Game, uid: &str) -> Result<Vec<GachaRecord>> {
    let records = sqlx::query_as::<_, GachaRecord>(
        r#"
        SELECT game, uid, pool_id, pool_type, gacha_id, item_id, count, time,
               name, item_type, rank_type, lang, record_id
        FROM gacha_records
        WHERE game = ? AND uid = ?
        ORDER BY pool_id, record_id
        "#,
    )
    .bind(game.as_str())
    .bind(uid)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Every pool of one account, ready for pity and streak computation.
///
/// Pools appear in the game's display order with unknown pools last; records
/// inside a pool are newest first by numeric draw id. A blank uid yields an
/// empty view.
pub async fn aggregated_view(pool: &SqlitePool, game: Game, uid: &str) -> Result<AggregatedView> {
    if uid.trim().is_empty() {
        return Ok(AggregatedView::empty(game, uid));
    }

    let records = fetch_records(pool, game, uid).await?;
    Ok(AggregatedView {
        game,
        uid: uid.to_string(),
        pools: group_into_pools(game, records),
    })
}

/// Group rows by pool, fill missing pool types and apply display order.
pub fn group_into_pools(game: Game, records: Vec<GachaRecord>) -> Vec<GachaPool> {
    let mut grouped: BTreeMap<i64, Vec<GachaRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.pool_id).or_default().push(record);
    }

    let mut result: Vec<GachaPool> = grouped
        .into_iter()
        .map(|(pool_id, mut records)| {
            records.sort_by(|a, b| {
                b.sort_key()
                    .cmp(&a.sort_key())
                    .then_with(|| b.record_id.cmp(&a.record_id))
            });

            let stored = records
                .iter()
                .map(|record| record.pool_type.as_str())
                .find(|pool_type| !pool_type.trim().is_empty());
            let pool_type = match stored {
                Some(pool_type) => pool_type.to_string(),
                None => {
                    let label = pools::pool_label(game, pool_id);
                    if label.is_none() {
                        debug!(%game, pool_id, "No pool type stored or known");
                    }
                    label.unwrap_or_default().to_string()
                }
            };

            GachaPool {
                pool_id,
                pool_type,
                records,
            }
        })
        .collect();

    result.sort_by_key(|pool| pools::pool_order(game, pool.pool_id));
    result
}
