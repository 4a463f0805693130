//! Static per-game pool metadata.
//!
//! Stored rows from legacy files often carry no pool type, and pool display
//! order is a product decision rather than anything the game reports. Both are
//! filled from these tables. Supporting a new game or banner means adding a
//! row here.

use crate::game::Game;

/// Label and display rank of a known pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    pub pool_id: i64,
    pub label: &'static str,
    /// Lower sorts first.
    pub priority: usize,
}

const STAR_RAIL_POOLS: &[PoolInfo] = &[
    PoolInfo { pool_id: 11, label: "Character Event Warp", priority: 0 },
    PoolInfo { pool_id: 12, label: "Light Cone Event Warp", priority: 1 },
    PoolInfo { pool_id: 1, label: "Stellar Warp", priority: 2 },
    PoolInfo { pool_id: 2, label: "Departure Warp", priority: 3 },
];

const ZENLESS_POOLS: &[PoolInfo] = &[
    PoolInfo { pool_id: 2, label: "Exclusive Channel", priority: 0 },
    PoolInfo { pool_id: 3, label: "W-Engine Channel", priority: 1 },
    PoolInfo { pool_id: 1, label: "Stable Channel", priority: 2 },
    PoolInfo { pool_id: 5, label: "Bangboo Channel", priority: 3 },
];

/// Known pools of a game, in display order.
pub fn known_pools(game: Game) -> &'static [PoolInfo] {
    match game {
        Game::StarRail => STAR_RAIL_POOLS,
        Game::ZenlessZoneZero => ZENLESS_POOLS,
    }
}

pub fn pool_info(game: Game, pool_id: i64) -> Option<&'static PoolInfo> {
    known_pools(game).iter().find(|info| info.pool_id == pool_id)
}

/// Static label for a pool, if the pool is known.
pub fn pool_label(game: Game, pool_id: i64) -> Option<&'static str> {
    pool_info(game, pool_id).map(|info| info.label)
}

/// Sort key for a pool: known pools by priority, then unknown pools by id.
pub fn pool_order(game: Game, pool_id: i64) -> (usize, i64) {
    match pool_info(game, pool_id) {
        Some(info) => (info.priority, pool_id),
        None => (usize::MAX, pool_id),
    }
}
