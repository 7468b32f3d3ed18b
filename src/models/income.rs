//! Income record model

use serde::{Deserialize, Serialize};

use super::ids::RecordId;
use super::record::{
    limit_length, require, require_date, require_finite, Collections, FinanceRecord, Record,
    RecordKind, RecordValidationError,
};

/// A received payment, optionally backed by an invoice attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Owner identifier (set by remote stores)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Calendar day (`YYYY-MM-DD`) or ISO timestamp
    pub date: String,

    pub source: String,

    pub amount: f64,

    /// Reference to the uploaded invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
}

impl Income {
    /// Create a new, unsaved income record
    pub fn new(date: impl Into<String>, source: impl Into<String>, amount: f64) -> Self {
        Self {
            id: None,
            uid: None,
            date: date.into(),
            source: source.into(),
            amount,
            invoice_url: None,
        }
    }

    pub fn with_invoice_url(mut self, url: impl Into<String>) -> Self {
        self.invoice_url = Some(url.into());
        self
    }
}

impl FinanceRecord for Income {
    const KIND: RecordKind = RecordKind::Income;

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
        format!("{} on {}", self.source, self.date)
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require_date("date", &self.date)?;
        require("source", &self.source)?;
        if let Some(url) = &self.invoice_url {
            limit_length("invoiceUrl", url)?;
        }
        require_finite(self.amount)
    }

    fn attachment_url_mut(&mut self) -> Option<&mut Option<String>> {
        Some(&mut self.invoice_url)
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.incomes
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.incomes
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Income(income) => Some(income),
            _ => None,
        }
    }
}

impl From<Income> for Record {
    fn from(income: Income) -> Self {
        Record::Income(income)
    }
}
