//! Audit logging system for FinTrack
//!
//! Records every create, update and delete of a finance record with
//! before/after values in an append-only JSON-lines log.
//!
//! - `AuditEntry`: one operation with timestamp, record kind, id, owner and
//!   optional before/after snapshots.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.
//! - `generate_diff`: human-readable field changes for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
