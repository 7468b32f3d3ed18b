//! Bill reminder model

use serde::{Deserialize, Serialize};

use super::ids::RecordId;
use super::record::{
    require, require_date, require_finite, Collections, FinanceRecord, Record, RecordKind,
    RecordValidationError,
};

/// An upcoming bill, optionally with the amount due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub title: String,

    pub due_date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Reminder {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id: None,
            uid: None,
            title: title.into(),
            due_date: due_date.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

impl FinanceRecord for Reminder {
    const KIND: RecordKind = RecordKind::Reminder;

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
        Some(&self.due_date)
    }

    fn describe(&self) -> String {
        format!("{} due {}", self.title, self.due_date)
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require("title", &self.title)?;
        require_date("dueDate", &self.due_date)?;
        match self.amount {
            Some(amount) => require_finite(amount),
            None => Ok(()),
        }
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.reminders
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.reminders
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Reminder(reminder) => Some(reminder),
            _ => None,
        }
    }
}

impl From<Reminder> for Record {
    fn from(reminder: Reminder) -> Self {
        Record::Reminder(reminder)
    }
}
