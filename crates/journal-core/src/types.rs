use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Lifecycle status of a bet. The transition is one-directional:
/// open bets may be resolved, resolved bets stay resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Open,
    Resolved,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Open => "open",
            BetStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "open" => Ok(BetStatus::Open),
            "resolved" => Ok(BetStatus::Resolved),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown bet status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A falsifiable statement with an attached subjective probability.
///
/// Outcome is `None` while the bet is open; once resolved, outcome and
/// `resolved_at` are both set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: Option<i64>,
    pub user_id: String,
    pub statement: String,
    /// Probability estimate in [0, 1].
    pub probability: f64,
    pub status: BetStatus,
    pub outcome: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Kind of journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Journal,
    Belief,
    Note,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Journal => "journal",
            EntryKind::Belief => "belief",
            EntryKind::Note => "note",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "journal" => Ok(EntryKind::Journal),
            "belief" => Ok(EntryKind::Belief),
            "note" => Ok(EntryKind::Note),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown entry kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-text journal record. Edits replace kind/text but never touch
/// `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<i64>,
    pub user_id: String,
    pub kind: EntryKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
