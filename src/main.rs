use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use fintrack::audit::AuditLogger;
use fintrack::cli::{
    handle_expense_command, handle_export_command, handle_income_command, handle_profile_command,
    handle_reminder_command, handle_saving_command,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::dashboard::Dashboard;
use fintrack::display::format_dashboard;
use fintrack::gateway::open_gateway;
use fintrack::models::Identity;
use fintrack::store::RecordStore;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker with ITR/GST spreadsheet export",
    long_about = "FinTrack records incomes, expenses, bill reminders and savings, \
                  and exports them as a tax-ready workbook for ITR or GST filing."
)]
struct Cli {
    /// Act as an authenticated user instead of the guest
    #[arg(long, global = true, env = "FINTRACK_USER")]
    user: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income commands
    #[command(subcommand)]
    Income(fintrack::cli::IncomeCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(fintrack::cli::ExpenseCommands),

    /// Bill reminder commands
    #[command(subcommand)]
    Reminder(fintrack::cli::ReminderCommands),

    /// Savings commands
    #[command(subcommand)]
    Saving(fintrack::cli::SavingCommands),

    /// Show totals and recent activity
    Dashboard,

    /// Profile commands
    #[command(subcommand)]
    Profile(fintrack::cli::ProfileCommands),

    /// Export an ITR/GST workbook
    Export(fintrack::cli::ExportArgs),

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Initialize paths and settings
    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let identity = Identity::from_uid(cli.user.as_deref());
    debug!("data directory {}, acting as {}", paths.base_dir().display(), identity);

    let open_store = || -> Result<RecordStore> {
        // No remote collaborators are linked into the binary; users stay local
        let gateway = open_gateway(&paths, &settings, identity.clone(), None)?;
        let store = RecordStore::open(gateway)?.with_audit(AuditLogger::new(paths.audit_log()));
        Ok(store)
    };

    match cli.command {
        Some(Commands::Income(cmd)) => {
            let mut store = open_store()?;
            handle_income_command(&mut store, &settings, cmd)?;
            store.close();
        }
        Some(Commands::Expense(cmd)) => {
            let mut store = open_store()?;
            handle_expense_command(&mut store, &settings, cmd)?;
            store.close();
        }
        Some(Commands::Reminder(cmd)) => {
            let mut store = open_store()?;
            handle_reminder_command(&mut store, &settings, cmd)?;
            store.close();
        }
        Some(Commands::Saving(cmd)) => {
            let mut store = open_store()?;
            handle_saving_command(&mut store, &settings, cmd)?;
            store.close();
        }
        Some(Commands::Dashboard) => {
            let store = open_store()?;
            let dashboard = Dashboard::from_collections(store.collections());
            println!("Dashboard for {}", store.identity());
            println!();
            print!("{}", format_dashboard(&dashboard, &settings));
            store.close();
        }
        Some(Commands::Profile(cmd)) => {
            handle_profile_command(&paths, &identity, cmd)?;
        }
        Some(Commands::Export(args)) => {
            let store = open_store()?;
            handle_export_command(&store, &paths, &settings, args)?;
            store.close();
        }
        Some(Commands::Init) => {
            println!("Initializing FinTrack at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'fintrack income add <source> <amount>' to record your first income.");
        }
        Some(Commands::Config) => {
            println!("FinTrack Configuration");
            println!("======================");
            println!("Base directory:        {}", paths.base_dir().display());
            println!("Data directory:        {}", paths.data_dir().display());
            println!("Attachments directory: {}", paths.attachments_dir().display());
            println!("Exports directory:     {}", paths.exports_dir().display());
            println!("Records file:          {}", paths.records_file(&identity).display());
            println!();
            println!("Settings:");
            println!("  Product name:     {}", settings.product_name);
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default variant:  {}", settings.default_variant);
            println!(
                "  Remote backend:   {}",
                if settings.remote.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
        Some(Commands::Audit { limit }) => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("FinTrack - personal finance tracking");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}
