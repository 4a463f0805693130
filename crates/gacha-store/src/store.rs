//! The operational store handed to UI and sync collaborators.

use tracing::info;

use crate::config::StoreConfig;
use crate::game::Game;
use crate::lifecycle::Uninitialized;
use crate::models::{Account, AggregatedView, RecordEntry};
use crate::normalize::GachaPayload;
use crate::{account, record, settings};
use crate::{Database, Result};

/// A store that has passed initialization and the legacy import check.
#[derive(Debug, Clone)]
pub struct GachaStore {
    db: Database,
    config: StoreConfig,
}

impl GachaStore {
    /// Run the full startup sequence and return the operational store.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let checked = Uninitialized::new(config.clone())
            .initialize()
            .await?
            .check_legacy_migration()
            .await?;
        Ok(checked.into_operational())
    }

    pub(crate) fn new(db: Database, config: StoreConfig) -> Self {
        Self { db, config }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub async fn list_uids(&self, game: Game) -> Result<Vec<String>> {
        record::list_uids(self.db.pool(), game).await
    }

    pub async fn aggregated_view(&self, game: Game, uid: &str) -> Result<AggregatedView> {
        record::aggregated_view(self.db.pool(), game, uid).await
    }

    pub async fn upsert_records(
        &self,
        game: Game,
        uid: &str,
        pool_id: i64,
        pool_type: &str,
        entries: &[RecordEntry],
    ) -> Result<u64> {
        record::upsert_records(&self.db, game, uid, pool_id, pool_type, entries).await
    }

    /// Store everything a live sync or imported file delivered.
    pub async fn sync_payload(&self, payload: &GachaPayload) -> Result<u64> {
        record::sync_payload(&self.db, payload).await
    }

    pub async fn delete_by_game_uid(&self, game: Game, uid: &str) -> Result<u64> {
        record::delete_by_game_uid(&self.db, game, uid).await
    }

    /// Stop tracking an account: purge its records and its account row.
    pub async fn remove_account(&self, game: Game, uid: &str) -> Result<u64> {
        let removed = account::purge_account(&self.db, game, uid).await?;
        info!(%game, uid, removed, "Removed account");
        Ok(removed)
    }

    pub async fn accounts(&self, game: Game) -> Result<Vec<Account>> {
        account::list_accounts(self.db.pool(), game).await
    }

    pub async fn current_game(&self) -> Result<Game> {
        settings::current_game(self.db.pool()).await
    }

    pub async fn set_current_game(&self, game: Game) -> Result<()> {
        settings::set_current_game(&self.db, game).await
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (tempfile::TempDir, GachaStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("app"), dir.path().join("legacy"));
        let store = GachaStore::open(&config).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_sync_and_remove_account() {
        let (_dir, store) = test_store().await;

        let payload = GachaPayload::from_json(
            Game::StarRail,
            r#"{ "info": { "uid": "100000001" },
                 "list": [ { "cardPoolId": 11, "cardPoolType": "Character Event Warp",
                             "records": [ { "id": "1", "gachaId": "2003" },
                                          { "id": "2", "gachaId": "2003" } ] } ] }"#,
        )
        .unwrap();

        assert_eq!(store.sync_payload(&payload).await.unwrap(), 2);
        assert_eq!(store.list_uids(Game::StarRail).await.unwrap(), vec!["100000001"]);

        account::upsert_account(store.database(), Game::StarRail, "100000001", None, false)
            .await
            .unwrap();

        assert_eq!(store.remove_account(Game::StarRail, "100000001").await.unwrap(), 2);
        assert!(store.list_uids(Game::StarRail).await.unwrap().is_empty());
        assert!(store.accounts(Game::StarRail).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_current_game_round_trip() {
        let (_dir, store) = test_store().await;

        assert_eq!(store.current_game().await.unwrap(), Game::StarRail);
        store.set_current_game(Game::ZenlessZoneZero).await.unwrap();
        assert_eq!(store.current_game().await.unwrap(), Game::ZenlessZoneZero);
    }
}
