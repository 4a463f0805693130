//! Store models.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::game::Game;

/// One draw as supplied by a producer, without its pool identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Game-assigned draw id (numeric text).
    pub record_id: String,
    /// Secondary banner id; empty for games that do not report one.
    pub gacha_id: String,
    pub item_id: String,
    /// Number of items obtained, never negative.
    pub count: i64,
    /// Draw timestamp, e.g. "2024-07-04 18:02:11".
    pub time: String,
    pub name: String,
    pub item_type: String,
    /// Opaque rarity code, e.g. "4" for the top rarity in Zenless Zone Zero.
    pub rank_type: String,
    pub lang: String,
}

/// A canonical stored draw, keyed by `(game, uid, pool_id, record_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaRecord {
    pub game: Game,
    pub uid: String,
    pub pool_id: i64,
    pub pool_type: String,
    pub record_id: String,
    pub gacha_id: String,
    pub item_id: String,
    pub count: i64,
    pub time: String,
    pub name: String,
    pub item_type: String,
    pub rank_type: String,
    pub lang: String,
}

impl GachaRecord {
    /// Build a canonical row from a producer entry and its pool identity.
    pub fn from_entry(game: Game, uid: &str, pool_id: i64, pool_type: &str, entry: RecordEntry) -> Self {
        Self {
            game,
            uid: uid.to_string(),
            pool_id,
            pool_type: pool_type.to_string(),
            record_id: entry.record_id,
            gacha_id: entry.gacha_id,
            item_id: entry.item_id,
            count: entry.count,
            time: entry.time,
            name: entry.name,
            item_type: entry.item_type,
            rank_type: entry.rank_type,
            lang: entry.lang,
        }
    }

    /// Numeric draw id used for ordering; non-numeric ids sort as 0.
    pub fn sort_key(&self) -> i64 {
        self.record_id.trim().parse().unwrap_or(0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for GachaRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let text = |column: &str| -> Result<String, sqlx::Error> {
            Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
        };

        Ok(Self {
            game: decode_game(row)?,
            uid: row.try_get("uid")?,
            pool_id: row.try_get("pool_id")?,
            pool_type: text("pool_type")?,
            record_id: row.try_get("record_id")?,
            gacha_id: text("gacha_id")?,
            item_id: text("item_id")?,
            count: row.try_get::<Option<i64>, _>("count")?.unwrap_or(0),
            time: text("time")?,
            name: text("name")?,
            item_type: text("item_type")?,
            rank_type: text("rank_type")?,
            lang: text("lang")?,
        })
    }
}

/// Draws of one pool, reconstructed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaPool {
    pub pool_id: i64,
    /// Stored pool type, or the static label when nothing was stored.
    pub pool_type: String,
    /// Newest first.
    pub records: Vec<GachaRecord>,
}

/// Every pool of one account, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedView {
    pub game: Game,
    pub uid: String,
    pub pools: Vec<GachaPool>,
}

impl AggregatedView {
    pub fn empty(game: Game, uid: &str) -> Self {
        Self {
            game,
            uid: uid.to_string(),
            pools: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(|pool| pool.records.is_empty())
    }

    /// Find a pool by id.
    pub fn pool(&self, pool_id: i64) -> Option<&GachaPool> {
        self.pools.iter().find(|pool| pool.pool_id == pool_id)
    }

    /// Total number of draws across all pools.
    pub fn record_count(&self) -> usize {
        self.pools.iter().map(|pool| pool.records.len()).sum()
    }
}

/// A tracked account. Optional bookkeeping next to the records table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub game: Game,
    pub uid: String,
    /// Display name, if known.
    pub name: Option<String>,
    /// Whether the account was discovered by the legacy import.
    pub is_legacy: bool,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            game: decode_game(row)?,
            uid: row.try_get("uid")?,
            name: row.try_get("name")?,
            is_legacy: row.try_get("is_legacy")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn decode_game(row: &SqliteRow) -> Result<Game, sqlx::Error> {
    let value: String = row.try_get("game")?;
    value.parse::<Game>().map_err(|e| sqlx::Error::ColumnDecode {
        index: "game".to_string(),
        source: Box::new(e),
    })
}
