//! Audit entry data structures
//!
//! Defines operation types and the entry format itself. Entries reference
//! records by kind and id and carry JSON snapshots of the record before and
//! after the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Record, RecordKind};

use super::diff::generate_diff;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Kind of record affected
    pub entity_type: RecordKind,

    pub entity_id: String,

    /// Owner the record belongs to (`guest` or a user id)
    pub owner: String,

    /// Human-readable description of the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: RecordKind,
        entity_id: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            owner: owner.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created record
    pub fn create(entity_id: impl Into<String>, owner: impl Into<String>, record: &Record) -> Self {
        Self {
            entity_name: Some(record.describe()),
            after: record.to_value().ok(),
            ..Self::base(Operation::Create, record.kind(), entity_id, owner)
        }
    }

    /// Entry for an updated record, with a field-level diff
    pub fn update(
        entity_id: impl Into<String>,
        owner: impl Into<String>,
        before: &Record,
        after: &Record,
    ) -> Self {
        let before_val = before.to_value().ok();
        let after_val = after.to_value().ok();
        let diff_summary = match (&before_val, &after_val) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            entity_name: Some(after.describe()),
            before: before_val,
            after: after_val,
            diff_summary,
            ..Self::base(Operation::Update, after.kind(), entity_id, owner)
        }
    }

    /// Entry for a deleted record
    pub fn delete(entity_id: impl Into<String>, owner: impl Into<String>, record: &Record) -> Self {
        Self {
            entity_name: Some(record.describe()),
            before: record.to_value().ok(),
            ..Self::base(Operation::Delete, record.kind(), entity_id, owner)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.owner
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" {}", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
