//! Dashboard summary
//!
//! Aggregates computed over everything an owner has recorded, independent of
//! any export window.

use crate::models::{Collections, Expense, Income};

/// Number of recent incomes and expenses shown
pub const RECENT_LIMIT: usize = 5;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub net: f64,
    pub total_savings: f64,
    pub reminder_count: usize,
    /// Records across all four collections
    pub item_count: usize,
    /// Categories in the order they first appear
    pub expenses_by_category: Vec<CategoryTotal>,
    pub recent_incomes: Vec<Income>,
    pub recent_expenses: Vec<Expense>,
}

impl Dashboard {
    pub fn from_collections(collections: &Collections) -> Self {
        let total_income = collections.incomes.iter().fold(0.0, |acc, i| acc + i.amount);
        let total_expense = collections
            .expenses
            .iter()
            .fold(0.0, |acc, e| acc + e.amount);

        let mut expenses_by_category: Vec<CategoryTotal> = Vec::new();
        for expense in &collections.expenses {
            match expenses_by_category
                .iter_mut()
                .find(|c| c.category == expense.category)
            {
                Some(total) => total.amount += expense.amount,
                None => expenses_by_category.push(CategoryTotal {
                    category: expense.category.clone(),
                    amount: expense.amount,
                }),
            }
        }

        Self {
            total_income,
            total_expense,
            net: total_income - total_expense,
            total_savings: collections.savings.iter().fold(0.0, |acc, s| acc + s.amount),
            reminder_count: collections.reminders.len(),
            item_count: collections.len(),
            expenses_by_category,
            recent_incomes: collections.incomes.iter().take(RECENT_LIMIT).cloned().collect(),
            recent_expenses: collections.expenses.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}
