//! Export aggregation
//!
//! Filters one owner's collections down to what an export covers and
//! flattens the result into sheet rows.

use crate::models::{Collections, Expense, Income, Reminder, Saving};

use super::filter::DateWindow;
use super::Variant;

/// What to include in an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub variant: Variant,
    pub window: DateWindow,
    pub include_reminders: bool,
    pub include_savings: bool,
    pub include_attachment_links: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            window: DateWindow::All,
            include_reminders: true,
            include_savings: true,
            include_attachment_links: true,
        }
    }
}

impl ExportOptions {
    pub fn new(variant: Variant, window: DateWindow) -> Self {
        Self {
            variant,
            window,
            ..Self::default()
        }
    }
}

/// Income and expense totals for an export
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    /// `income - expense`
    pub net: f64,
}

impl Totals {
    fn from_records(incomes: &[Income], expenses: &[Expense]) -> Self {
        let income = incomes.iter().fold(0.0, |acc, i| acc + i.amount);
        let expense = expenses.iter().fold(0.0, |acc, e| acc + e.amount);
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

/// The records an export covers
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSelection {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub reminders: Vec<Reminder>,
    pub savings: Vec<Saving>,
    pub totals: Totals,
    include_attachment_links: bool,
}

/// Filter `collections` by the options' window and flags
pub fn aggregate(collections: &Collections, options: &ExportOptions) -> ExportSelection {
    let window = &options.window;

    let incomes: Vec<Income> = collections
        .incomes
        .iter()
        .filter(|i| window.contains(&i.date))
        .cloned()
        .collect();
    let expenses: Vec<Expense> = collections
        .expenses
        .iter()
        .filter(|e| window.contains(&e.date))
        .cloned()
        .collect();

    let reminders = if options.include_reminders {
        collections
            .reminders
            .iter()
            .filter(|r| window.contains(&r.due_date))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    let savings = if options.include_savings {
        collections
            .savings
            .iter()
            .filter(|s| window.contains_optional(s.date.as_deref()))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let totals = Totals::from_records(&incomes, &expenses);
    ExportSelection {
        incomes,
        expenses,
        reminders,
        savings,
        totals,
        include_attachment_links: options.include_attachment_links,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRow {
    pub date: String,
    pub source: String,
    pub amount: f64,
    pub invoice_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub date: String,
    pub category: String,
    pub amount: f64,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRow {
    pub title: String,
    pub due_date: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingRow {
    pub name: String,
    pub amount: f64,
    pub date: Option<String>,
}

/// Flattened sheet rows, ready for the workbook builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRows {
    pub incomes: Vec<IncomeRow>,
    pub expenses: Vec<ExpenseRow>,
    pub reminders: Vec<ReminderRow>,
    pub savings: Vec<SavingRow>,
    pub totals: Totals,
}

impl ExportRows {
    /// Number of data rows across all sheets except the summary
    pub fn row_count(&self) -> usize {
        self.incomes.len() + self.expenses.len() + self.reminders.len() + self.savings.len()
    }
}

impl ExportSelection {
    pub fn rows(&self) -> ExportRows {
        let links = self.include_attachment_links;
        ExportRows {
            incomes: self
                .incomes
                .iter()
                .map(|i| IncomeRow {
                    date: i.date.clone(),
                    source: i.source.clone(),
                    amount: i.amount,
                    invoice_url: if links { i.invoice_url.clone() } else { None },
                })
                .collect(),
            expenses: self
                .expenses
                .iter()
                .map(|e| ExpenseRow {
                    date: e.date.clone(),
                    category: e.category.clone(),
                    amount: e.amount,
                    receipt_url: if links { e.receipt_url.clone() } else { None },
                })
                .collect(),
            reminders: self
                .reminders
                .iter()
                .map(|r| ReminderRow {
                    title: r.title.clone(),
                    due_date: r.due_date.clone(),
                    amount: r.amount,
                })
                .collect(),
            savings: self
                .savings
                .iter()
                .map(|s| SavingRow {
                    name: s.name.clone(),
                    amount: s.amount,
                    date: s.date.clone(),
                })
                .collect(),
            totals: self.totals,
        }
    }
}

/// `<product>-<variant>-<scope>`, e.g. `fintrack-itr-2024-01`
pub fn export_file_stem(product: &str, variant: Variant, window: &DateWindow) -> String {
    format!(
        "{}-{}-{}",
        product,
        variant.to_string().to_lowercase(),
        window.scope()
    )
}
