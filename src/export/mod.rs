//! Tax export for FinTrack
//!
//! Turns one owner's records into an ITR or GST workbook:
//! - `filter`: date windows (all, month, inclusive range)
//! - `aggregate`: filtered selection, totals and flattened rows
//! - `workbook`: sheet layout, hyperlinks and xlsx serialization

pub mod aggregate;
pub mod filter;
pub mod workbook;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::FintrackResult;
use crate::models::Collections;

pub use aggregate::{
    aggregate, export_file_stem, ExpenseRow, ExportOptions, ExportRows, ExportSelection,
    IncomeRow, ReminderRow, SavingRow, Totals,
};
pub use filter::{day_key, DateWindow};
pub use workbook::{build_workbook, cell_ref, column_letter, Cell, CellValue, Sheet, Workbook};

/// Filing variant; only changes labels and file names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Variant {
    /// Income tax return
    #[default]
    Itr,
    /// Goods and services tax
    Gst,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Itr => write!(f, "ITR"),
            Self::Gst => write!(f, "GST"),
        }
    }
}

/// Rows shown in a preview, per sheet
pub const PREVIEW_ROWS: usize = 20;

/// What an export would contain, without writing it
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPreview {
    pub totals: Totals,
    pub row_count: usize,
    pub file_name: String,
    pub incomes: Vec<IncomeRow>,
    pub expenses: Vec<ExpenseRow>,
    pub hyperlinks: usize,
}

/// An export run for one product name and set of options
pub struct TaxExport {
    product: String,
    options: ExportOptions,
}

impl TaxExport {
    pub fn new(product: impl Into<String>, options: ExportOptions) -> Self {
        Self {
            product: product.into(),
            options,
        }
    }

    pub fn file_stem(&self) -> String {
        export_file_stem(&self.product, self.options.variant, &self.options.window)
    }

    pub fn rows(&self, collections: &Collections) -> ExportRows {
        aggregate(collections, &self.options).rows()
    }

    pub fn preview(&self, collections: &Collections) -> ExportPreview {
        let rows = self.rows(collections);
        let hyperlinks = build_workbook(&rows, self.options.variant).hyperlink_count();
        ExportPreview {
            totals: rows.totals,
            row_count: rows.row_count(),
            file_name: format!("{}.xlsx", self.file_stem()),
            incomes: rows.incomes.iter().take(PREVIEW_ROWS).cloned().collect(),
            expenses: rows.expenses.iter().take(PREVIEW_ROWS).cloned().collect(),
            hyperlinks,
        }
    }

    /// Build and write the workbook into `dir`, returning the file path
    pub fn write(&self, collections: &Collections, dir: &Path) -> FintrackResult<PathBuf> {
        let rows = self.rows(collections);
        debug!(
            "exporting {} rows for {} ({})",
            rows.row_count(),
            self.options.variant,
            self.options.window
        );
        build_workbook(&rows, self.options.variant).write_export(dir, &self.file_stem())
    }
}
