//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the record store.

pub mod expense;
pub mod export;
pub mod income;
pub mod profile;
pub mod reminder;
pub mod saving;

use std::path::Path;

use chrono::Local;

use crate::error::FintrackResult;
use crate::gateway::Attachment;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportArgs};
pub use income::{handle_income_command, IncomeCommands};
pub use profile::{handle_profile_command, ProfileCommands};
pub use reminder::{handle_reminder_command, ReminderCommands};
pub use saving::{handle_saving_command, SavingCommands};

/// Today's date as `YYYY-MM-DD`, the default for new records
pub(crate) fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub(crate) fn read_attachment(path: Option<&Path>) -> FintrackResult<Option<Attachment>> {
    path.map(Attachment::from_path).transpose()
}
