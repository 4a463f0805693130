//! Mapping of per-game draw payloads into canonical rows.
//!
//! Live sync and the legacy record files share one JSON shape per game:
//!
//! ```json
//! {
//!   "info": { "uid": "1300000001" },
//!   "list": [
//!     {
//!       "cardPoolId": 2,
//!       "cardPoolType": "Exclusive Channel",
//!       "records": [
//!         { "id": "1719972000000123", "itemId": "1041", "count": "1",
//!           "time": "2024-07-03 10:00:00", "name": "Ellen", "itemType": "Agents",
//!           "rankType": "4", "lang": "en-us" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Star Rail records additionally carry `gachaId`. Everything here is pure:
//! missing fields become empty strings, unparsable counts become 0, and a
//! payload without an account or pool list normalizes to nothing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::game::Game;
use crate::models::{GachaRecord, RecordEntry};
use crate::Result;

/// Account section of a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uid: Option<String>,
}

/// One pool of a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadPool<R> {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub card_pool_id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub card_pool_type: Option<String>,
    pub records: Option<Vec<R>>,
}

/// Identity section plus pools, generic over the game's record shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPayload<R> {
    #[serde(default)]
    pub info: Option<PayloadInfo>,
    pub list: Option<Vec<PayloadPool<R>>>,
}

/// A Star Rail warp record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRailRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gacha_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub count: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: Option<String>,
}

/// A Zenless Zone Zero signal search record. Has no secondary pool id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZenlessRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub count: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: Option<String>,
}

pub type StarRailPayload = RawPayload<StarRailRecord>;
pub type ZenlessPayload = RawPayload<ZenlessRecord>;

/// A draw payload from any producer, tagged by game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GachaPayload {
    StarRail(StarRailPayload),
    Zenless(ZenlessPayload),
}

impl GachaPayload {
    /// Decode a payload in the given game's JSON shape.
    pub fn from_json(game: Game, json: &str) -> Result<Self> {
        Ok(match game {
            Game::StarRail => GachaPayload::StarRail(serde_json::from_str(json)?),
            Game::ZenlessZoneZero => GachaPayload::Zenless(serde_json::from_str(json)?),
        })
    }

    /// Account id the payload belongs to, if it names one.
    pub fn uid(&self) -> Option<&str> {
        match self {
            GachaPayload::StarRail(payload) => payload_uid(payload),
            GachaPayload::Zenless(payload) => payload_uid(payload),
        }
    }

    pub fn normalize(&self) -> Vec<PoolBatch> {
        match self {
            GachaPayload::StarRail(payload) => normalize_star_rail(payload),
            GachaPayload::Zenless(payload) => normalize_zenless(payload),
        }
    }
}

/// Canonical entries of one pool, ready for the upsert path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolBatch {
    pub game: Game,
    pub uid: String,
    pub pool_id: i64,
    pub pool_type: String,
    pub entries: Vec<RecordEntry>,
}

impl PoolBatch {
    /// Full canonical rows as they will be stored.
    pub fn records(&self) -> Vec<GachaRecord> {
        self.entries
            .iter()
            .cloned()
            .map(|entry| {
                GachaRecord::from_entry(self.game, &self.uid, self.pool_id, &self.pool_type, entry)
            })
            .collect()
    }
}

pub fn normalize_star_rail(payload: &StarRailPayload) -> Vec<PoolBatch> {
    normalize_with(Game::StarRail, payload, |record| RecordEntry {
        record_id: text(&record.id),
        gacha_id: text(&record.gacha_id),
        item_id: text(&record.item_id),
        count: parse_count(record.count.as_deref()),
        time: text(&record.time),
        name: text(&record.name),
        item_type: text(&record.item_type),
        rank_type: text(&record.rank_type),
        lang: text(&record.lang),
    })
}

pub fn normalize_zenless(payload: &ZenlessPayload) -> Vec<PoolBatch> {
    normalize_with(Game::ZenlessZoneZero, payload, |record| RecordEntry {
        record_id: text(&record.id),
        gacha_id: String::new(),
        item_id: text(&record.item_id),
        count: parse_count(record.count.as_deref()),
        time: text(&record.time),
        name: text(&record.name),
        item_type: text(&record.item_type),
        rank_type: text(&record.rank_type),
        lang: text(&record.lang),
    })
}

fn normalize_with<R>(
    game: Game,
    payload: &RawPayload<R>,
    map: impl Fn(&R) -> RecordEntry,
) -> Vec<PoolBatch> {
    let (Some(uid), Some(list)) = (payload_uid(payload), payload.list.as_ref()) else {
        return Vec::new();
    };

    list.iter()
        .map(|pool| PoolBatch {
            game,
            uid: uid.to_string(),
            pool_id: pool.card_pool_id,
            pool_type: text(&pool.card_pool_type),
            entries: pool
                .records
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(&map)
                .collect(),
        })
        .collect()
}

fn payload_uid<R>(payload: &RawPayload<R>) -> Option<&str> {
    payload
        .info
        .as_ref()
        .and_then(|info| info.uid.as_deref())
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Parse a draw count; anything unparsable or negative counts as 0.
pub fn parse_count(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|count| *count >= 0)
        .unwrap_or(0)
}

/// Accept strings, numbers and booleans as text; anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
