//! Core data models for FinTrack
//!
//! This module contains the four finance record kinds (incomes, expenses,
//! bill reminders and savings), their identifiers, and the profile blob.

pub mod expense;
pub mod ids;
pub mod income;
pub mod profile;
pub mod record;
pub mod reminder;
pub mod saving;

pub use expense::Expense;
pub use ids::{Identity, RecordId, GUEST_ID};
pub use income::Income;
pub use profile::Profile;
pub use record::{
    Collections, FinanceRecord, Record, RecordKind, RecordValidationError, Snapshot,
    MAX_TEXT_LEN,
};
pub use reminder::Reminder;
pub use saving::Saving;
