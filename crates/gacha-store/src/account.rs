//! Tracked account bookkeeping.
//!
//! Nothing in the record path depends on these rows; uids are always
//! discoverable from `gacha_records` itself.

use sqlx::SqlitePool;

use crate::game::Game;
use crate::models::Account;
use crate::{Database, Result};

/// Create or update an account. A legacy flag, once set, is kept.
pub async fn upsert_account(
    db: &Database,
    game: Game,
    uid: &str,
    name: Option<&str>,
    is_legacy: bool,
) -> Result<()> {
    let uid = uid.trim();
    if uid.is_empty() {
        return Ok(());
    }

    let writer = db.writer().await;
    sqlx::query(
        r#"
        INSERT INTO accounts (game, uid, name, is_legacy, updated_at)
        VALUES (?, ?, ?, ?, datetime('now'))
        ON CONFLICT(game, uid) DO UPDATE SET
            name = COALESCE(excluded.name, accounts.name),
            is_legacy = MAX(accounts.is_legacy, excluded.is_legacy),
            updated_at = datetime('now')
        "#,
    )
    .bind(game.as_str())
    .bind(uid)
    .bind(name)
    .bind(is_legacy)
    .execute(writer.pool())
    .await?;

    Ok(())
}

/// List accounts of a game, ordered by uid.
pub async fn list_accounts(pool: &SqlitePool, game: Game) -> Result<Vec<Account>> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"
        SELECT game, uid, name, is_legacy, updated_at
        FROM accounts
        WHERE game = ?
        ORDER BY uid
        "#,
    )
    .bind(game.as_str())
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Delete an account's records and its account row in one transaction.
///
/// A blank uid deletes nothing. Returns the number of records removed.
pub async fn purge_account(db: &Database, game: Game, uid: &str) -> Result<u64> {
    if uid.trim().is_empty() {
        return Ok(0);
    }

    let writer = db.writer().await;
    let mut tx = writer.begin().await?;

    let records = sqlx::query(
        r#"
        DELETE FROM gacha_records
        WHERE game = ? AND uid = ?
        "#,
    )
    .bind(game.as_str())
    .bind(uid)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM accounts
        WHERE game = ? AND uid = ?
        "#,
    )
    .bind(game.as_str())
    .bind(uid)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(records.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordEntry;
    use crate::record;
    use crate::test_support::{count_records, test_db};

    fn entries(ids: &[&str]) -> Vec<RecordEntry> {
        ids.iter()
            .map(|id| RecordEntry {
                record_id: id.to_string(),
                count: 1,
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_account_crud() {
        let (_dir, db) = test_db().await;

        upsert_account(&db, Game::StarRail, "100000002", None, true)
            .await
            .unwrap();
        upsert_account(&db, Game::StarRail, "100000001", Some("Trailblazer"), false)
            .await
            .unwrap();
        upsert_account(&db, Game::ZenlessZoneZero, "100000001", None, false)
            .await
            .unwrap();

        let accounts = list_accounts(db.pool(), Game::StarRail).await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].uid, "100000001");
        assert_eq!(accounts[0].name.as_deref(), Some("Trailblazer"));
        assert!(accounts[1].is_legacy);
        assert!(accounts[1].updated_at.is_some());

        purge_account(&db, Game::StarRail, "100000001").await.unwrap();
        assert_eq!(list_accounts(db.pool(), Game::StarRail).await.unwrap().len(), 1);
        assert_eq!(
            list_accounts(db.pool(), Game::ZenlessZoneZero).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_upsert_keeps_name_and_legacy_flag() {
        let (_dir, db) = test_db().await;

        upsert_account(&db, Game::ZenlessZoneZero, "42", Some("Proxy"), true)
            .await
            .unwrap();
        upsert_account(&db, Game::ZenlessZoneZero, "42", None, false)
            .await
            .unwrap();

        let accounts = list_accounts(db.pool(), Game::ZenlessZoneZero).await.unwrap();
        assert_eq!(accounts[0].name.as_deref(), Some("Proxy"));
        assert!(accounts[0].is_legacy);
    }

    #[tokio::test]
    async fn test_blank_uid_is_ignored() {
        let (_dir, db) = test_db().await;

        upsert_account(&db, Game::StarRail, "  ", None, false).await.unwrap();
        assert!(list_accounts(db.pool(), Game::StarRail).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_removes_records_and_account() {
        let (_dir, db) = test_db().await;

        record::upsert_records(&db, Game::StarRail, "100000001", 1, "", &entries(&["1", "2"]))
            .await
            .unwrap();
        record::upsert_records(&db, Game::StarRail, "100000002", 1, "", &entries(&["1"]))
            .await
            .unwrap();
        upsert_account(&db, Game::StarRail, "100000001", None, true)
            .await
            .unwrap();
        upsert_account(&db, Game::StarRail, "100000002", None, true)
            .await
            .unwrap();

        assert_eq!(purge_account(&db, Game::StarRail, "100000001").await.unwrap(), 2);

        assert_eq!(count_records(&db, Game::StarRail, "100000001").await, 0);
        assert_eq!(count_records(&db, Game::StarRail, "100000002").await, 1);
        let accounts = list_accounts(db.pool(), Game::StarRail).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].uid, "100000002");
    }

    #[tokio::test]
    async fn test_failed_purge_keeps_records() {
        let (_dir, db) = test_db().await;

        record::upsert_records(&db, Game::ZenlessZoneZero, "42", 2, "", &entries(&["1", "2"]))
            .await
            .unwrap();
        sqlx::query("DROP TABLE accounts")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(purge_account(&db, Game::ZenlessZoneZero, "42").await.is_err());
        assert_eq!(count_records(&db, Game::ZenlessZoneZero, "42").await, 2);
    }

    #[tokio::test]
    async fn test_purge_blank_uid_is_noop() {
        let (_dir, db) = test_db().await;

        record::upsert_records(&db, Game::StarRail, "7", 1, "", &entries(&["1"]))
            .await
            .unwrap();

        assert_eq!(purge_account(&db, Game::StarRail, " ").await.unwrap(), 0);
        assert_eq!(count_records(&db, Game::StarRail, "7").await, 1);
    }
}
