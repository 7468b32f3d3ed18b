//! Record listings
//!
//! Renders each collection as a table. Ids are shortened to their first
//! eight characters; any unique prefix is accepted back by the CLI.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Expense, FinanceRecord, Income, Reminder, Saving};

fn short_id<R: FinanceRecord>(record: &R) -> String {
    record
        .id()
        .map(|id| id.short().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

#[derive(Tabled)]
struct IncomeLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Invoice")]
    invoice: String,
}

pub fn format_income_list(incomes: &[Income], settings: &Settings) -> String {
    if incomes.is_empty() {
        return "No incomes recorded.".to_string();
    }
    render(
        incomes
            .iter()
            .map(|i| IncomeLine {
                id: short_id(i),
                date: i.date.clone(),
                source: i.source.clone(),
                amount: settings.format_amount(i.amount),
                invoice: or_dash(i.invoice_url.as_deref()),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ExpenseLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Receipt")]
    receipt: String,
}

pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.".to_string();
    }
    render(
        expenses
            .iter()
            .map(|e| ExpenseLine {
                id: short_id(e),
                date: e.date.clone(),
                category: e.category.clone(),
                amount: settings.format_amount(e.amount),
                receipt: or_dash(e.receipt_url.as_deref()),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ReminderLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

pub fn format_reminder_list(reminders: &[Reminder], settings: &Settings) -> String {
    if reminders.is_empty() {
        return "No reminders set.".to_string();
    }
    render(
        reminders
            .iter()
            .map(|r| ReminderLine {
                id: short_id(r),
                title: r.title.clone(),
                due: r.due_date.clone(),
                amount: r
                    .amount
                    .map(|a| settings.format_amount(a))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct SavingLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Date")]
    date: String,
}

pub fn format_saving_list(savings: &[Saving], settings: &Settings) -> String {
    if savings.is_empty() {
        return "No savings recorded.".to_string();
    }
    render(
        savings
            .iter()
            .map(|s| SavingLine {
                id: short_id(s),
                name: s.name.clone(),
                amount: settings.format_amount(s.amount),
                date: or_dash(s.date.as_deref()),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    #[test]
    fn test_empty_lists() {
        let settings = Settings::default();
        assert_eq!(format_income_list(&[], &settings), "No incomes recorded.");
        assert_eq!(format_saving_list(&[], &settings), "No savings recorded.");
    }

    #[test]
    fn test_income_table() {
        let settings = Settings::default();
        let mut income = Income::new("2024-01-05", "Job", 50000.0);
        income.id = Some(RecordId::from_string("0123456789abcdef"));

        let output = format_income_list(&[income], &settings);
        assert!(output.contains("Source"));
        assert!(output.contains("01234567"));
        assert!(!output.contains("0123456789"));
        assert!(output.contains("₹50000.00"));
    }

    #[test]
    fn test_undated_saving_shows_dash() {
        let output = format_saving_list(&[Saving::new("Emergency", 10.0)], &Settings::default());
        assert!(output.contains("Emergency"));
        assert!(output.contains('-'));
    }
}
