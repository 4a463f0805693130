//! Key/value settings shared with the surrounding application.

use sqlx::SqlitePool;

use crate::game::Game;
use crate::{Database, Result};

/// Setting holding the game the user last selected.
pub const CURRENT_GAME_KEY: &str = "Config_CurrentGame";

/// Get a setting value. A stored NULL reads the same as a missing key.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT value FROM settings
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value.flatten())
}

/// Create or update a setting.
pub async fn set_setting(db: &Database, key: &str, value: &str) -> Result<()> {
    let writer = db.writer().await;
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(writer.pool())
    .await?;

    Ok(())
}

/// Remove a setting. Returns true if one existed.
pub async fn remove_setting(db: &Database, key: &str) -> Result<bool> {
    let writer = db.writer().await;
    let result = sqlx::query(
        r#"
        DELETE FROM settings
        WHERE key = ?
        "#,
    )
    .bind(key)
    .execute(writer.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Selected game, defaulting to Star Rail when unset or unreadable.
pub async fn current_game(pool: &SqlitePool) -> Result<Game> {
    let stored = get_setting(pool, CURRENT_GAME_KEY).await?;
    Ok(stored
        .and_then(|value| value.parse::<Game>().ok())
        .unwrap_or(Game::StarRail))
}

pub async fn set_current_game(db: &Database, game: Game) -> Result<()> {
    set_setting(db, CURRENT_GAME_KEY, game.as_str()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_setting_crud() {
        let (_dir, db) = test_db().await;

        assert!(get_setting(db.pool(), "theme").await.unwrap().is_none());

        set_setting(&db, "theme", "dark").await.unwrap();
        set_setting(&db, "theme", "light").await.unwrap();
        assert_eq!(
            get_setting(db.pool(), "theme").await.unwrap(),
            Some("light".to_string())
        );

        assert!(remove_setting(&db, "theme").await.unwrap());
        assert!(!remove_setting(&db, "theme").await.unwrap());
        assert!(get_setting(db.pool(), "theme").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_game() {
        let (_dir, db) = test_db().await;

        assert_eq!(current_game(db.pool()).await.unwrap(), Game::StarRail);

        set_current_game(&db, Game::ZenlessZoneZero).await.unwrap();
        assert_eq!(current_game(db.pool()).await.unwrap(), Game::ZenlessZoneZero);

        set_setting(&db, CURRENT_GAME_KEY, "garbage").await.unwrap();
        assert_eq!(current_game(db.pool()).await.unwrap(), Game::StarRail);
    }
}
