//! Savings goal model

use serde::{Deserialize, Serialize};

use super::ids::RecordId;
use super::record::{
    require, require_date, require_finite, Collections, FinanceRecord, Record, RecordKind,
    RecordValidationError,
};

/// Money set aside toward a named goal
///
/// The date is optional; undated savings count as relevant to every period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saving {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    pub name: String,

    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Saving {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: None,
            uid: None,
            name: name.into(),
            amount,
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

impl FinanceRecord for Saving {
    const KIND: RecordKind = RecordKind::Saving;

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
        self.date.as_deref()
    }

    fn describe(&self) -> String {
        match &self.date {
            Some(date) => format!("{} on {}", self.name, date),
            None => self.name.clone(),
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        require("name", &self.name)?;
        if let Some(date) = &self.date {
            require_date("date", date)?;
        }
        require_finite(self.amount)
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.savings
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.savings
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Saving(saving) => Some(saving),
            _ => None,
        }
    }
}

impl From<Saving> for Record {
    fn from(saving: Saving) -> Self {
        Record::Saving(saving)
    }
}
