//! Display formatting for terminal output
//!
//! Record tables plus the dashboard, export preview and profile views.

pub mod records;
pub mod summary;

pub use records::{format_expense_list, format_income_list, format_reminder_list, format_saving_list};
pub use summary::{format_dashboard, format_export_preview, format_profile};
