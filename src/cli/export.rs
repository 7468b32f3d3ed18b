//! Export CLI command
//!
//! Builds the ITR/GST workbook for a date window and writes it to the
//! exports directory (or only previews it with `--dry-run`).

use std::path::PathBuf;

use clap::Args;

use crate::config::{FintrackPaths, Settings};
use crate::display::format_export_preview;
use crate::error::FintrackResult;
use crate::export::{DateWindow, ExportOptions, TaxExport, Variant};
use crate::store::RecordStore;

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Filing variant (defaults to the configured one)
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Export a single month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub month: Option<String>,

    /// Start of an inclusive date range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// End of an inclusive date range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Leave out the Reminders sheet
    #[arg(long)]
    pub no_reminders: bool,

    /// Leave out the Savings sheet
    #[arg(long)]
    pub no_savings: bool,

    /// Leave out invoice and receipt links
    #[arg(long)]
    pub no_links: bool,

    /// Directory to write into (defaults to the exports directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Show what would be exported without writing a file
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    fn window(&self) -> FintrackResult<DateWindow> {
        match (&self.month, &self.from, &self.to) {
            (Some(month), _, _) => DateWindow::month(month),
            (None, Some(from), Some(to)) => DateWindow::range(from, to),
            _ => Ok(DateWindow::All),
        }
    }

    pub fn options(&self, settings: &Settings) -> FintrackResult<ExportOptions> {
        Ok(ExportOptions {
            variant: self.variant.unwrap_or(settings.default_variant),
            window: self.window()?,
            include_reminders: !self.no_reminders,
            include_savings: !self.no_savings,
            include_attachment_links: !self.no_links,
        })
    }
}

/// Handle the export command
pub fn handle_export_command(
    store: &RecordStore,
    paths: &FintrackPaths,
    settings: &Settings,
    args: ExportArgs,
) -> FintrackResult<()> {
    let options = args.options(settings)?;
    let export = TaxExport::new(settings.product_name.clone(), options);
    let collections = store.collections();

    let preview = export.preview(collections);
    print!("{}", format_export_preview(&preview, settings));

    if args.dry_run {
        println!();
        println!("Dry run: nothing written.");
        return Ok(());
    }

    let dir = args.output_dir.unwrap_or_else(|| paths.exports_dir());
    let path = export.write(collections, &dir)?;
    println!();
    println!("Exported to {}", path.display());
    Ok(())
}
