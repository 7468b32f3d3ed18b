//! Income CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_income_list;
use crate::error::{FintrackError, FintrackResult};
use crate::gateway::AttachmentChange;
use crate::models::{Income, RecordKind};
use crate::store::RecordStore;

use super::{read_attachment, today};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record an income
    Add {
        /// Where the money came from
        source: String,

        /// Amount received
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Date received (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Invoice file to attach
        #[arg(long)]
        attach: Option<PathBuf>,
    },

    /// List incomes, newest first
    List,

    /// Change an income; omitted fields keep their values
    Update {
        /// Income ID (or a unique prefix)
        id: String,

        #[arg(short, long)]
        source: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(short, long)]
        date: Option<String>,

        /// Replace the attached invoice
        #[arg(long)]
        attach: Option<PathBuf>,

        /// Remove the attached invoice
        #[arg(long, conflicts_with = "attach")]
        clear_attachment: bool,
    },

    /// Delete an income
    Delete {
        /// Income ID (or a unique prefix)
        id: String,
    },
}

/// Handle an income command
pub fn handle_income_command(
    store: &mut RecordStore,
    settings: &Settings,
    cmd: IncomeCommands,
) -> FintrackResult<()> {
    match cmd {
        IncomeCommands::Add {
            source,
            amount,
            date,
            attach,
        } => {
            let attachment = read_attachment(attach.as_deref())?;
            let income = Income::new(date.unwrap_or_else(today), source, amount);
            let id = store.add(income, attachment.as_ref())?;

            let saved = store
                .get::<Income>(&id)
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Income, id.as_str()))?;
            println!(
                "Added income: {} {} (ID: {})",
                saved.source,
                settings.format_amount(saved.amount),
                id.short()
            );
            if let Some(url) = &saved.invoice_url {
                println!("Invoice: {}", url);
            }
        }

        IncomeCommands::List => {
            println!("{}", format_income_list(store.list::<Income>(), settings));
        }

        IncomeCommands::Update {
            id,
            source,
            amount,
            date,
            attach,
            clear_attachment,
        } => {
            let id = store.resolve_id(RecordKind::Income, &id)?;
            let mut income = store
                .get::<Income>(&id)
                .cloned()
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Income, id.as_str()))?;

            if let Some(source) = source {
                income.source = source;
            }
            if let Some(amount) = amount {
                income.amount = amount;
            }
            if let Some(date) = date {
                income.date = date;
            }

            let attachment = read_attachment(attach.as_deref())?;
            let change = if clear_attachment {
                AttachmentChange::Remove
            } else {
                AttachmentChange::from(attachment.as_ref())
            };
            store.update(&id, income, change)?;
            println!("Updated income {}", id.short());
        }

        IncomeCommands::Delete { id } => {
            let id = store.resolve_id(RecordKind::Income, &id)?;
            store.delete(RecordKind::Income, &id)?;
            println!("Deleted income {}", id.short());
        }
    }

    Ok(())
}
