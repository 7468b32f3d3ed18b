//! Savings CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_saving_list;
use crate::error::{FintrackError, FintrackResult};
use crate::gateway::AttachmentChange;
use crate::models::{RecordKind, Saving};
use crate::store::RecordStore;

/// Saving subcommands
#[derive(Subcommand)]
pub enum SavingCommands {
    /// Record money set aside
    Add {
        /// Goal or account name
        name: String,

        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Date saved (YYYY-MM-DD); undated savings appear in every export
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List savings
    List,

    /// Change a saving; omitted fields keep their values
    Update {
        /// Saving ID (or a unique prefix)
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(short, long)]
        date: Option<String>,

        /// Make the saving undated
        #[arg(long, conflicts_with = "date")]
        clear_date: bool,
    },

    /// Delete a saving
    Delete {
        /// Saving ID (or a unique prefix)
        id: String,
    },
}

/// Handle a saving command
pub fn handle_saving_command(
    store: &mut RecordStore,
    settings: &Settings,
    cmd: SavingCommands,
) -> FintrackResult<()> {
    match cmd {
        SavingCommands::Add { name, amount, date } => {
            let mut saving = Saving::new(name, amount);
            saving.date = date;
            let id = store.add(saving, None)?;
            println!(
                "Added saving {} (ID: {})",
                settings.format_amount(amount),
                id.short()
            );
        }

        SavingCommands::List => {
            println!("{}", format_saving_list(store.list::<Saving>(), settings));
        }

        SavingCommands::Update {
            id,
            name,
            amount,
            date,
            clear_date,
        } => {
            let id = store.resolve_id(RecordKind::Saving, &id)?;
            let mut saving = store
                .get::<Saving>(&id)
                .cloned()
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Saving, id.as_str()))?;

            if let Some(name) = name {
                saving.name = name;
            }
            if let Some(amount) = amount {
                saving.amount = amount;
            }
            if date.is_some() || clear_date {
                saving.date = date;
            }

            store.update(&id, saving, AttachmentChange::Keep)?;
            println!("Updated saving {}", id.short());
        }

        SavingCommands::Delete { id } => {
            let id = store.resolve_id(RecordKind::Saving, &id)?;
            store.delete(RecordKind::Saving, &id)?;
            println!("Deleted saving {}", id.short());
        }
    }

    Ok(())
}
