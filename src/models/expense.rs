//! Expense record model

use serde::{Deserialize, Serialize};

use super::ids::RecordId;
use super::record::{
    limit_length, require, require_date, require_finite, Collections, FinanceRecord, Record,
    RecordKind, RecordValidationError,
};

/// Money spent, optionally backed by a receipt attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub date: String,

    pub category: String,

    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl Expense {
    /// Create a new, unsaved expense record
    pub fn new(date: impl Into<String>, category: impl Into<String>, amount: f64) -> Self {
        Self {
            id: None,
            uid: None,
            date: date.into(),
            category: category.into(),
            amount,
            receipt_url: None,
        }
    }

    pub fn with_receipt_url(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }
}

impl FinanceRecord for Expense {
    const KIND: RecordKind = RecordKind::Expense;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: Option<String>) {
        self.uid = uid;
    }

    fn sort_key(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn describe(&self) -> String {
        format!("{} on {}", self.category, self.date)
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_date("date", &self.date)?;
        require("category", &self.category)?;
        if let Some(url) = &self.receipt_url {
            limit_length("receiptUrl", url)?;
        }
        require_finite(self.amount)
    }

    fn attachment_url_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.receipt_url)
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.expenses
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.expenses
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Expense(expense) => Some(expense),
            _ => None,
        }
    }
}

impl From<Expense> for Record {
    fn from(expense: Expense) -> Self {
        Record::Expense(expense)
    }
}
