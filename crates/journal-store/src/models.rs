//! Internal row types mapping TEXT-dated SQLite rows to domain types.

use chrono::{DateTime, Utc};
use journal_core::{Bet, BetStatus, DomainError, Entry, EntryKind};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct BetRow {
    pub id: Option<i64>,
    pub user_id: String,
    pub statement: String,
    pub probability: f64,
    pub status: String,
    pub outcome: Option<bool>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

impl BetRow {
    /// Rows with a status outside the closed enum fail here rather than
    /// leaking into the analyzers.
    pub(crate) fn into_bet(self) -> Result<Bet, DomainError> {
        Ok(Bet {
            id: self.id,
            user_id: self.user_id,
            statement: self.statement,
            probability: self.probability,
            status: BetStatus::parse(&self.status)?,
            outcome: self.outcome,
            created_at: parse_timestamp(&self.created_at),
            resolved_at: self.resolved_at.as_deref().map(parse_timestamp),
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EntryRow {
    pub id: Option<i64>,
    pub user_id: String,
    pub kind: String,
    pub text: String,
    pub created_at: String,
}

impl EntryRow {
    pub(crate) fn into_entry(self) -> Result<Entry, DomainError> {
        Ok(Entry {
            id: self.id,
            user_id: self.user_id,
            kind: EntryKind::parse(&self.kind)?,
            text: self.text,
            created_at: parse_timestamp(&self.created_at),
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now())
}
