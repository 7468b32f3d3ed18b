//! Dashboard, export preview, and profile formatting

use crate::config::Settings;
use crate::dashboard::Dashboard;
use crate::export::ExportPreview;
use crate::models::Profile;

/// Format the dashboard as a short report
pub fn format_dashboard(dashboard: &Dashboard, settings: &Settings) -> String {
    let money = |amount: f64| settings.format_amount(amount);
    let mut output = String::new();

    output.push_str(&format!("Total income:    {:>14}\n", money(dashboard.total_income)));
    output.push_str(&format!("Total expenses:  {:>14}\n", money(dashboard.total_expense)));
    output.push_str(&format!("Net:             {:>14}\n", money(dashboard.net)));
    output.push_str(&format!("Savings:         {:>14}\n", money(dashboard.total_savings)));
    output.push_str(&format!("Reminders:       {:>14}\n", dashboard.reminder_count));
    output.push_str(&format!("Items tracked:   {:>14}\n", dashboard.item_count));

    if !dashboard.expenses_by_category.is_empty() {
        output.push_str("\nExpenses by category:\n");
        for total in &dashboard.expenses_by_category {
            output.push_str(&format!("  {:<20} {:>14}\n", total.category, money(total.amount)));
        }
    }

    if !dashboard.recent_incomes.is_empty() {
        output.push_str("\nRecent incomes:\n");
        for income in &dashboard.recent_incomes {
            output.push_str(&format!(
                "  {}  {:<20} {:>14}\n",
                income.date,
                income.source,
                money(income.amount)
            ));
        }
    }

    if !dashboard.recent_expenses.is_empty() {
        output.push_str("\nRecent expenses:\n");
        for expense in &dashboard.recent_expenses {
            output.push_str(&format!(
                "  {}  {:<20} {:>14}\n",
                expense.date,
                expense.category,
                money(expense.amount)
            ));
        }
    }

    output
}

/// Format an export preview
pub fn format_export_preview(preview: &ExportPreview, settings: &Settings) -> String {
    let money = |amount: f64| settings.format_amount(amount);
    let mut output = String::new();

    output.push_str(&format!("File:            {}\n", preview.file_name));
    output.push_str(&format!("Rows:            {}\n", preview.row_count));
    output.push_str(&format!("Hyperlinks:      {}\n", preview.hyperlinks));
    output.push_str(&format!("Total income:    {}\n", money(preview.totals.income)));
    output.push_str(&format!("Total expenses:  {}\n", money(preview.totals.expense)));
    output.push_str(&format!("Savings:         {}\n", money(preview.totals.net)));

    if !preview.incomes.is_empty() {
        output.push_str("\nIncomes:\n");
        for row in &preview.incomes {
            output.push_str(&format!("  {}  {:<20} {:>14}\n", row.date, row.source, money(row.amount)));
        }
    }
    if !preview.expenses.is_empty() {
        output.push_str("\nExpenses:\n");
        for row in &preview.expenses {
            output.push_str(&format!(
                "  {}  {:<20} {:>14}\n",
                row.date,
                row.category,
                money(row.amount)
            ));
        }
    }

    output
}

pub fn format_profile(profile: &Profile) -> String {
    if profile.is_empty() {
        return "No profile details set.".to_string();
    }
    let field = |value: &str| if value.is_empty() { "-".to_string() } else { value.to_string() };
    format!(
        "Name:     {}\nEmail:    {}\nAddress:  {}\nPhone:    {}\n",
        field(&profile.name),
        field(&profile.email),
        field(&profile.address),
        field(&profile.phone)
    )
}
