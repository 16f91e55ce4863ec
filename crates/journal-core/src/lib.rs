//! Shared domain types for the journaling and prediction-tracking service.
//!
//! Bets are falsifiable statements with an attached subjective probability,
//! later resolved true or false. Entries are free-text journal records.
//! Validation for both lives here so the store and API layers share one
//! set of bounds.

pub mod error;
pub mod types;
pub mod validate;

pub use error::DomainError;
pub use types::{Bet, BetStatus, Entry, EntryKind};
pub use validate::{validate_bet_input, validate_entry_input, validate_probability};
