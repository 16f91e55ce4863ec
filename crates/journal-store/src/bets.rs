use anyhow::Result;
use chrono::Utc;
use journal_core::{validate_bet_input, Bet, DomainError};

use crate::db::JournalDb;
use crate::models::BetRow;

pub struct BetStore {
    db: JournalDb,
}

impl BetStore {
    pub fn new(db: JournalDb) -> Self {
        Self { db }
    }

    /// Create a new open bet owned by `user_id`.
    pub async fn create(&self, user_id: &str, statement: &str, probability: f64) -> Result<i64> {
        validate_bet_input(statement, probability)?;

        let result = sqlx::query(
            r#"
            INSERT INTO bets (user_id, statement, probability, status, created_at)
            VALUES (?, ?, ?, 'open', ?)
            "#,
        )
        .bind(user_id)
        .bind(statement)
        .bind(probability)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All bets for a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Bet>> {
        let rows: Vec<BetRow> = sqlx::query_as(
            "SELECT * FROM bets WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|r| r.into_bet().map_err(Into::into))
            .collect()
    }

    pub async fn get(&self, user_id: &str, id: i64) -> Result<Option<Bet>> {
        let row: Option<BetRow> =
            sqlx::query_as("SELECT * FROM bets WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.db.pool())
                .await?;

        row.map(|r| r.into_bet().map_err(Into::into)).transpose()
    }

    /// Edit statement/probability of an open bet. Resolved bets are frozen
    /// so the calibration record cannot be rewritten after the fact.
    ///
    /// The status guard lives in the UPDATE itself so a concurrent resolve
    /// cannot slip in between a check and the write.
    pub async fn update(
        &self,
        user_id: &str,
        id: i64,
        statement: &str,
        probability: f64,
    ) -> Result<()> {
        validate_bet_input(statement, probability)?;

        let result = sqlx::query(
            r#"
            UPDATE bets
            SET statement = ?, probability = ?
            WHERE id = ? AND user_id = ? AND status = 'open'
            "#,
        )
        .bind(statement)
        .bind(probability)
        .bind(id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.open_bet_gone(user_id, id).await?.into());
        }

        Ok(())
    }

    /// Resolve an open bet with its realized outcome. One-directional:
    /// resolving an already-resolved bet is a conflict. The `status = 'open'`
    /// predicate makes the transition atomic, so of two racing resolves
    /// exactly one wins.
    pub async fn resolve(&self, user_id: &str, id: i64, outcome: bool) -> Result<Bet> {
        let result = sqlx::query(
            r#"
            UPDATE bets
            SET status = 'resolved', outcome = ?, resolved_at = ?
            WHERE id = ? AND user_id = ? AND status = 'open'
            "#,
        )
        .bind(outcome)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.open_bet_gone(user_id, id).await?.into());
        }

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Bet not found: {}", id)).into())
    }

    /// Classify why a guarded open-only mutation touched zero rows:
    /// the bet either does not exist for this user, or is already resolved.
    async fn open_bet_gone(&self, user_id: &str, id: i64) -> Result<DomainError> {
        match self.get(user_id, id).await? {
            None => Ok(DomainError::NotFound(format!("Bet not found: {}", id))),
            Some(_) => Ok(DomainError::Conflict("Bet is already resolved".to_string())),
        }
    }

    pub async fn delete(&self, user_id: &str, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM bets WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Bet not found: {}", id)).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::BetStatus;
    use std::sync::Arc;

    async fn store() -> BetStore {
        let db = JournalDb::new("sqlite::memory:").await.unwrap();
        BetStore::new(db)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store().await;
        let id = store.create("alice", "It rains tomorrow", 0.3).await.unwrap();

        let bet = store.get("alice", id).await.unwrap().unwrap();
        assert_eq!(bet.statement, "It rains tomorrow");
        assert_eq!(bet.probability, 0.3);
        assert_eq!(bet.status, BetStatus::Open);
        assert_eq!(bet.outcome, None);
        assert_eq!(bet.resolved_at, None);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let store = store().await;
        assert!(store.create("alice", "", 0.5).await.is_err());
        assert!(store.create("alice", "fine", 1.5).await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_sets_outcome_and_timestamp() {
        let store = store().await;
        let id = store.create("alice", "BTC above 100k by June", 0.6).await.unwrap();

        let resolved = store.resolve("alice", id, true).await.unwrap();
        assert_eq!(resolved.status, BetStatus::Resolved);
        assert_eq!(resolved.outcome, Some(true));
        assert!(resolved.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_resolve_is_one_directional() {
        let store = store().await;
        let id = store.create("alice", "statement", 0.5).await.unwrap();
        store.resolve("alice", id, false).await.unwrap();

        let err = store.resolve("alice", id, true).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_resolved_bet() {
        let store = store().await;
        let id = store.create("alice", "statement", 0.5).await.unwrap();
        store.resolve("alice", id, true).await.unwrap();

        let err = store.update("alice", id, "rewritten", 0.9).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = store().await;
        let err = store.update("alice", 999, "statement", 0.5).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_resolves_have_single_winner() {
        // File-backed database so both tasks see the same rows even when
        // the pool hands them separate connections.
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("bets.db").display());
        let db = JournalDb::new(&url).await.unwrap();
        let store = Arc::new(BetStore::new(db));

        for _ in 0..25 {
            let id = store.create("alice", "contested", 0.5).await.unwrap();

            let (a, b) = (store.clone(), store.clone());
            let first = tokio::spawn(async move { a.resolve("alice", id, true).await });
            let second = tokio::spawn(async move { b.resolve("alice", id, false).await });
            let (r1, r2) = (first.await.unwrap(), second.await.unwrap());

            assert_eq!(
                r1.is_ok() as u32 + r2.is_ok() as u32,
                1,
                "exactly one of two racing resolves must win"
            );

            let r1_ok = r1.is_ok();
            let loser = if r1_ok { r2 } else { r1 };
            assert!(matches!(
                loser.unwrap_err().downcast_ref::<DomainError>(),
                Some(DomainError::Conflict(_))
            ));

            // The winner's outcome sticks
            let bet = store.get("alice", id).await.unwrap().unwrap();
            assert_eq!(bet.status, BetStatus::Resolved);
            assert_eq!(bet.outcome, Some(r1_ok));
            assert!(bet.resolved_at.is_some());
        }
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let store = store().await;
        let id = store.create("alice", "private forecast", 0.7).await.unwrap();

        assert!(store.get("bob", id).await.unwrap().is_none());
        assert!(store.resolve("bob", id, true).await.is_err());
        assert!(store.delete("bob", id).await.is_err());
        assert!(store.list("bob").await.unwrap().is_empty());

        // Still intact for the owner
        assert!(store.get("alice", id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = store().await;
        let err = store.delete("alice", 999).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }
}
