//! Expense CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_expense_list;
use crate::error::{FintrackError, FintrackResult};
use crate::gateway::AttachmentChange;
use crate::models::{Expense, RecordKind};
use crate::store::RecordStore;

use super::{read_attachment, today};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the money was spent on
        category: String,

        /// Amount spent
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Date spent (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Receipt file to attach
        #[arg(long)]
        attach: Option<PathBuf>,
    },

    /// List expenses, newest first
    List,

    /// Change an expense; omitted fields keep their values
    Update {
        /// Expense ID (or a unique prefix)
        id: String,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(short, long)]
        date: Option<String>,

        /// Replace the attached receipt
        #[arg(long)]
        attach: Option<PathBuf>,

        /// Remove the attached receipt
        #[arg(long, conflicts_with = "attach")]
        clear_attachment: bool,
    },

    /// Delete an expense
    Delete {
        /// Expense ID (or a unique prefix)
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    store: &mut RecordStore,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> FintrackResult<()> {
    match cmd {
        ExpenseCommands::Add {
            category,
            amount,
            date,
            attach,
        } => {
            let attachment = read_attachment(attach.as_deref())?;
            let expense = Expense::new(date.unwrap_or_else(today), category, amount);
            let id = store.add(expense, attachment.as_ref())?;

            let saved = store
                .get::<Expense>(&id)
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Expense, id.as_str()))?;
            println!(
                "Added expense: {} {} (ID: {})",
                saved.category,
                settings.format_amount(saved.amount),
                id.short()
            );
            if let Some(url) = &saved.receipt_url {
                println!("Receipt: {}", url);
            }
        }

        ExpenseCommands::List => {
            println!("{}", format_expense_list(store.list::<Expense>(), settings));
        }

        ExpenseCommands::Update {
            id,
            category,
            amount,
            date,
            attach,
            clear_attachment,
        } => {
            let id = store.resolve_id(RecordKind::Expense, &id)?;
            let mut expense = store
                .get::<Expense>(&id)
                .cloned()
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Expense, id.as_str()))?;

            if let Some(category) = category {
                expense.category = category;
            }
            if let Some(amount) = amount {
                expense.amount = amount;
            }
            if let Some(date) = date {
                expense.date = date;
            }

            let attachment = read_attachment(attach.as_deref())?;
            let change = if clear_attachment {
                AttachmentChange::Remove
            } else {
                AttachmentChange::from(attachment.as_ref())
            };
            store.update(&id, expense, change)?;
            println!("Updated expense {}", id.short());
        }

        ExpenseCommands::Delete { id } => {
            let id = store.resolve_id(RecordKind::Expense, &id)?;
            store.delete(RecordKind::Expense, &id)?;
            println!("Deleted expense {}", id.short());
        }
    }

    Ok(())
}
