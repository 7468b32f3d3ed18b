//! Bill reminder CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_reminder_list;
use crate::error::{FintrackError, FintrackResult};
use crate::gateway::AttachmentChange;
use crate::models::{RecordKind, Reminder};
use crate::store::RecordStore;

/// Reminder subcommands
#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Add a bill reminder
    Add {
        /// What is due
        title: String,

        /// Due date (YYYY-MM-DD)
        due: String,

        /// Amount due, if known
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,
    },

    /// List reminders
    List,

    /// Change a reminder; omitted fields keep their values
    Update {
        /// Reminder ID (or a unique prefix)
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// Drop the amount
        #[arg(long, conflicts_with = "amount")]
        clear_amount: bool,
    },

    /// Delete a reminder
    Delete {
        /// Reminder ID (or a unique prefix)
        id: String,
    },
}

/// Handle a reminder command
pub fn handle_reminder_command(
    store: &mut RecordStore,
    settings: &Settings,
    cmd: ReminderCommands,
) -> FintrackResult<()> {
    match cmd {
        ReminderCommands::Add { title, due, amount } => {
            let mut reminder = Reminder::new(title, due);
            reminder.amount = amount;
            let id = store.add(reminder, None)?;
            println!("Added reminder (ID: {})", id.short());
        }

        ReminderCommands::List => {
            println!("{}", format_reminder_list(store.list::<Reminder>(), settings));
        }

        ReminderCommands::Update {
            id,
            title,
            due,
            amount,
            clear_amount,
        } => {
            let id = store.resolve_id(RecordKind::Reminder, &id)?;
            let mut reminder = store
                .get::<Reminder>(&id)
                .cloned()
                .ok_or_else(|| FintrackError::record_not_found(RecordKind::Reminder, id.as_str()))?;

            if let Some(title) = title {
                reminder.title = title;
            }
            if let Some(due) = due {
                reminder.due_date = due;
            }
            if amount.is_some() || clear_amount {
                reminder.amount = amount;
            }

            store.update(&id, reminder, AttachmentChange::Keep)?;
            println!("Updated reminder {}", id.short());
        }

        ReminderCommands::Delete { id } => {
            let id = store.resolve_id(RecordKind::Reminder, &id)?;
            store.delete(RecordKind::Reminder, &id)?;
            println!("Deleted reminder {}", id.short());
        }
    }

    Ok(())
}
