//! SQLite persistence for bets and journal entries.
//!
//! Every read and mutation is owner-scoped: queries always filter on
//! `user_id`, so one user can never see or touch another user's rows.

pub mod bets;
pub mod db;
pub mod entries;
mod models;

pub use bets::BetStore;
pub use db::JournalDb;
pub use entries::EntryStore;
