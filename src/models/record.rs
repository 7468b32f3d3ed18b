//! Shared record plumbing
//!
//! Defines the record kinds, the `FinanceRecord` trait implemented by the four
//! record models, the type-erased `Record` enum passed across gateways, and
//! the `Collections` holder for one owner's data.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;
use super::ids::RecordId;
use super::income::Income;
use super::reminder::Reminder;
use super::saving::Saving;

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
    Reminder,
    Saving,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Income,
        RecordKind::Expense,
        RecordKind::Reminder,
        RecordKind::Saving,
    ];

    /// Human-readable singular label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Reminder => "Reminder",
            Self::Saving => "Saving",
        }
    }

    /// Collection name used by document stores and blobs
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Income => "incomes",
            Self::Expense => "expenses",
            Self::Reminder => "reminders",
            Self::Saving => "savings",
        }
    }

    /// Folder attachments of this kind are uploaded under, if any
    pub fn attachment_folder(&self) -> Option<&'static str> {
        match self {
            Self::Income => Some("invoices"),
            Self::Expense => Some("receipts"),
            Self::Reminder | Self::Saving => None,
        }
    }

    /// Whether snapshots are ordered ascending (only reminders are)
    pub fn sorts_ascending(&self) -> bool {
        matches!(self, Self::Reminder)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Validation errors for record fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyField(&'static str),
    InvalidDate(&'static str, String),
    TooLong(&'static str),
    NonFiniteAmount,
}

/// Longest text a record field may hold (one spreadsheet cell)
pub const MAX_TEXT_LEN: usize = 32_767;

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{} cannot be empty", field),
            Self::InvalidDate(field, value) => write!(
                f,
                "{} '{}' is not a YYYY-MM-DD date or RFC 3339 timestamp",
                field, value
            ),
            Self::TooLong(field) => {
                write!(f, "{} is longer than {} characters", field, MAX_TEXT_LEN)
            }
            Self::NonFiniteAmount => write!(f, "Amount must be a finite number"),
        }
    }
}

impl std::error::Error for RecordValidationError {}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::EmptyField(field));
    }
    limit_length(field, value)
}

pub(crate) fn limit_length(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(RecordValidationError::TooLong(field));
    }
    Ok(())
}

/// Require a calendar day (`YYYY-MM-DD`) or a timestamp starting with one
///
/// Exports compare the first ten characters as text, so anything that is not
/// zero-padded ISO would silently fall outside month and range windows.
pub(crate) fn require_date(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    require(field, value)?;
    let invalid = || RecordValidationError::InvalidDate(field, value.to_string());

    let day = value.get(..10).ok_or_else(invalid)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| invalid())?;
    // chrono accepts unpadded fields like 2024-1-05 when they happen to fill ten chars
    if !day.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    }) {
        return Err(invalid());
    }

    if value.len() > 10
        && DateTime::parse_from_rfc3339(value).is_err()
        && NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_err()
    {
        return Err(invalid());
    }
    Ok(())
}

pub(crate) fn require_finite(amount: f64) -> Result<(), RecordValidationError> {
    if !amount.is_finite() {
        return Err(RecordValidationError::NonFiniteAmount);
    }
    Ok(())
}

/// Behaviour shared by income, expense, reminder and saving records
pub trait FinanceRecord: Clone + Serialize + DeserializeOwned + Into<Record> {
    const KIND: RecordKind;

    fn id(&self) -> Option<&RecordId>;

    fn set_id(&mut self, id: RecordId);

    fn uid(&self) -> Option<&str>;

    fn set_uid(&mut self, uid: Option<String>);

    /// Value snapshots are ordered by (`date` or `dueDate`)
    fn sort_key(&self) -> Option<&str>;

    /// Short description for listings and the audit trail
    fn describe(&self) -> String;

    fn validate(&self) -> Result<(), RecordValidationError>;

    /// Mutable access to the attachment reference for kinds that carry one
    fn attachment_url_mut(&mut self) -> Option<&mut Option<String>> {
        None
    }

    fn collection(collections: &Collections) -> &Vec<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self>;

    /// Recover the typed record from a type-erased one
    fn from_record(record: Record) -> Option<Self>;
}

/// A record of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Income(Income),
    Expense(Expense),
    Reminder(Reminder),
    Saving(Saving),
}

macro_rules! each_record {
    ($record:expr, $inner:ident => $body:expr) => {
        match $record {
            Record::Income($inner) => $body,
            Record::Expense($inner) => $body,
            Record::Reminder($inner) => $body,
            Record::Saving($inner) => $body,
        }
    };
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Income(_) => RecordKind::Income,
            Self::Expense(_) => RecordKind::Expense,
            Self::Reminder(_) => RecordKind::Reminder,
            Self::Saving(_) => RecordKind::Saving,
        }
    }

    pub fn id(&self) -> Option<&RecordId> {
        each_record!(self, r => r.id())
    }

    pub fn set_id(&mut self, id: RecordId) {
        each_record!(self, r => r.set_id(id))
    }

    pub fn uid(&self) -> Option<&str> {
        each_record!(self, r => r.uid())
    }

    pub fn set_uid(&mut self, uid: Option<String>) {
        each_record!(self, r => r.set_uid(uid))
    }

    pub fn describe(&self) -> String {
        each_record!(self, r => r.describe())
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        each_record!(self, r => r.validate())
    }

    pub fn attachment_url_mut(&mut self) -> Option<&mut Option<String>> {
        each_record!(self, r => r.attachment_url_mut())
    }

    /// Serialize the record's own fields (without the `kind` tag)
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        each_record!(self, r => serde_json::to_value(r))
    }
}

/// One owner's four collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub savings: Vec<Saving>,
}

impl Collections {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of records across all collections
    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len() + self.reminders.len() + self.savings.len()
    }

    pub fn get<R: FinanceRecord>(&self, id: &RecordId) -> Option<&R> {
        R::collection(self).iter().find(|r| r.id() == Some(id))
    }

    /// Find a record of the given kind by id
    pub fn find(&self, kind: RecordKind, id: &RecordId) -> Option<Record> {
        match kind {
            RecordKind::Income => self.get::<Income>(id).cloned().map(Record::from),
            RecordKind::Expense => self.get::<Expense>(id).cloned().map(Record::from),
            RecordKind::Reminder => self.get::<Reminder>(id).cloned().map(Record::from),
            RecordKind::Saving => self.get::<Saving>(id).cloned().map(Record::from),
        }
    }

    /// Insert a new record at the front of its collection
    pub fn prepend(&mut self, record: Record) {
        each_record!(record, r => prepend_typed(self, r))
    }

    /// Replace the record with the same id; returns false if absent
    pub fn replace(&mut self, record: Record) -> bool {
        each_record!(record, r => replace_typed(self, r))
    }

    /// Remove a record by id, returning it if it was present
    pub fn remove(&mut self, kind: RecordKind, id: &RecordId) -> Option<Record> {
        match kind {
            RecordKind::Income => remove_typed::<Income>(self, id).map(Record::from),
            RecordKind::Expense => remove_typed::<Expense>(self, id).map(Record::from),
            RecordKind::Reminder => remove_typed::<Reminder>(self, id).map(Record::from),
            RecordKind::Saving => remove_typed::<Saving>(self, id).map(Record::from),
        }
    }

    /// Replace one collection wholesale with a snapshot
    pub fn apply(&mut self, snapshot: Snapshot) {
        match snapshot {
            Snapshot::Incomes(items) => self.incomes = items,
            Snapshot::Expenses(items) => self.expenses = items,
            Snapshot::Reminders(items) => self.reminders = items,
            Snapshot::Savings(items) => self.savings = items,
        }
    }

    /// Full-collection snapshot of one kind
    pub fn snapshot(&self, kind: RecordKind) -> Snapshot {
        match kind {
            RecordKind::Income => Snapshot::Incomes(self.incomes.clone()),
            RecordKind::Expense => Snapshot::Expenses(self.expenses.clone()),
            RecordKind::Reminder => Snapshot::Reminders(self.reminders.clone()),
            RecordKind::Saving => Snapshot::Savings(self.savings.clone()),
        }
    }
}

fn prepend_typed<R: FinanceRecord>(collections: &mut Collections, record: R) {
    R::collection_mut(collections).insert(0, record);
}

fn replace_typed<R: FinanceRecord>(collections: &mut Collections, record: R) -> bool {
    let items = R::collection_mut(collections);
    match items.iter().position(|r| r.id().is_some() && r.id() == record.id()) {
        Some(idx) => {
            items[idx] = record;
            true
        }
        None => false,
    }
}

fn remove_typed<R: FinanceRecord>(collections: &mut Collections, id: &RecordId) -> Option<R> {
    let items = R::collection_mut(collections);
    let idx = items.iter().position(|r| r.id() == Some(id))?;
    Some(items.remove(idx))
}

/// A full replacement of one collection, as pushed by a snapshot feed
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Incomes(Vec<Income>),
    Expenses(Vec<Expense>),
    Reminders(Vec<Reminder>),
    Savings(Vec<Saving>),
}

impl Snapshot {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Incomes(_) => RecordKind::Income,
            Self::Expenses(_) => RecordKind::Expense,
            Self::Reminders(_) => RecordKind::Reminder,
            Self::Savings(_) => RecordKind::Saving,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Incomes(items) => items.len(),
            Self::Expenses(items) => items.len(),
            Self::Reminders(items) => items.len(),
            Self::Savings(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_income(id: &str, amount: f64) -> Income {
        let mut income = Income::new("2024-01-05", "Job", amount);
        income.set_id(RecordId::from_string(id));
        income
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut c = Collections::default();
        c.prepend(saved_income("a", 1.0).into());
        c.prepend(saved_income("b", 2.0).into());
        assert_eq!(c.incomes[0].id.as_ref().unwrap().as_str(), "b");
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut c = Collections::default();
        c.prepend(saved_income("a", 1.0).into());

        assert!(c.replace(saved_income("a", 9.0).into()));
        assert_eq!(c.incomes[0].amount, 9.0);
        assert!(!c.replace(saved_income("zzz", 1.0).into()));

        let removed = c.remove(RecordKind::Income, &RecordId::from_string("a"));
        assert!(matches!(removed, Some(Record::Income(_))));
        assert!(c.is_empty());
        assert!(c
            .remove(RecordKind::Income, &RecordId::from_string("a"))
            .is_none());
    }

    #[test]
    fn test_apply_replaces_only_matching_collection() {
        let mut c = Collections::default();
        c.prepend(saved_income("a", 1.0).into());
        c.prepend(Expense::new("2024-01-01", "Food", 3.0).into());

        c.apply(Snapshot::Incomes(vec![]));
        assert!(c.incomes.is_empty());
        assert_eq!(c.expenses.len(), 1);
    }

    #[test]
    fn test_record_value_has_no_kind_tag() {
        let record: Record = Reminder::new("Rent", "2024-02-01").into();
        let value = record.to_value().unwrap();
        assert!(value.get("kind").is_none());
        assert_eq!(value["dueDate"], "2024-02-01");
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(RecordKind::Income.attachment_folder(), Some("invoices"));
        assert_eq!(RecordKind::Expense.attachment_folder(), Some("receipts"));
        assert_eq!(RecordKind::Saving.attachment_folder(), None);
        assert!(RecordKind::Reminder.sorts_ascending());
        assert!(!RecordKind::Saving.sorts_ascending());
    }
}
