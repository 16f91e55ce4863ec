use anyhow::Result;
use chrono::{DateTime, Utc};
use journal_core::{validate_entry_input, DomainError, Entry, EntryKind};

use crate::db::JournalDb;
use crate::models::EntryRow;

pub struct EntryStore {
    db: JournalDb,
}

impl EntryStore {
    pub fn new(db: JournalDb) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: &str, kind: EntryKind, text: &str) -> Result<i64> {
        validate_entry_input(text)?;

        let result = sqlx::query(
            "INSERT INTO entries (user_id, kind, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All entries for a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Entry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT * FROM entries WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|r| r.into_entry().map_err(Into::into))
            .collect()
    }

    /// Entries created at or after `cutoff`. RFC 3339 UTC timestamps
    /// compare lexicographically, so the filter runs in SQL.
    pub async fn list_since(&self, user_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<Entry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT * FROM entries
            WHERE user_id = ? AND created_at >= ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(cutoff.to_rfc3339())
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter()
            .map(|r| r.into_entry().map_err(Into::into))
            .collect()
    }

    pub async fn get(&self, user_id: &str, id: i64) -> Result<Option<Entry>> {
        let row: Option<EntryRow> =
            sqlx::query_as("SELECT * FROM entries WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.db.pool())
                .await?;

        row.map(|r| r.into_entry().map_err(Into::into)).transpose()
    }

    /// Replace kind/text. `created_at` is never touched by edits.
    pub async fn update(
        &self,
        user_id: &str,
        id: i64,
        kind: EntryKind,
        text: &str,
    ) -> Result<()> {
        validate_entry_input(text)?;

        let result =
            sqlx::query("UPDATE entries SET kind = ?, text = ? WHERE id = ? AND user_id = ?")
                .bind(kind.as_str())
                .bind(text)
                .bind(id)
                .bind(user_id)
                .execute(self.db.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Entry not found: {}", id)).into());
        }

        Ok(())
    }

    pub async fn delete(&self, user_id: &str, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Entry not found: {}", id)).into());
        }

        Ok(())
    }
}
