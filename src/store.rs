//! Record store
//!
//! Holds the in-memory view of one identity's four collections. The view is
//! replaced only by snapshots from the gateway's feed, so what the store
//! shows is always what the backend last reported.

use log::debug;

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::{FintrackError, FintrackResult};
use crate::feed::Subscription;
use crate::gateway::{Attachment, AttachmentChange, BackendMode, RecordsGateway};
use crate::models::{Collections, FinanceRecord, Identity, Record, RecordId, RecordKind};

/// Live view of one identity's records plus the mutations that feed it
pub struct RecordStore {
    gateway: Box<dyn RecordsGateway>,
    subscription: Option<Subscription>,
    collections: Collections,
    audit: Option<AuditLogger>,
}

impl RecordStore {
    /// Subscribe to the gateway and load the initial snapshots
    pub fn open(gateway: Box<dyn RecordsGateway>) -> FintrackResult<Self> {
        let subscription = gateway.subscribe()?;
        let mut store = Self {
            gateway,
            subscription: Some(subscription),
            collections: Collections::default(),
            audit: None,
        };
        store.sync();
        Ok(store)
    }

    /// Record every successful mutation to an audit log
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn identity(&self) -> &Identity {
        self.gateway.identity()
    }

    pub fn mode(&self) -> BackendMode {
        self.gateway.mode()
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Apply every pending snapshot, returning how many were applied
    ///
    /// Snapshots replace whole collections, so when several are queued for
    /// the same collection the last one wins.
    pub fn sync(&mut self) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };
        let pending = subscription.drain();
        let count = pending.len();
        for snapshot in pending {
            self.collections.apply(snapshot);
        }
        if count > 0 {
            debug!("applied {} snapshot(s) for {}", count, self.identity());
        }
        count
    }

    pub fn list<R: FinanceRecord>(&self) -> &[R] {
        R::collection(&self.collections)
    }

    pub fn get<R: FinanceRecord>(&self, id: &RecordId) -> Option<&R> {
        self.collections.get::<R>(id)
    }

    /// Validate and store a new record
    pub fn add<R: FinanceRecord>(
        &mut self,
        record: R,
        attachment: Option<&Attachment>,
    ) -> FintrackResult<RecordId> {
        record
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        let record: Record = record.into();
        let id = self.gateway.create(record.clone(), attachment)?;
        self.sync();

        let stored = self.collections.find(R::KIND, &id).unwrap_or(record);
        self.log(|owner| AuditEntry::create(id.as_str(), owner, &stored))?;
        Ok(id)
    }

    /// Replace an existing record's fields
    ///
    /// `AttachmentChange::Keep` leaves the stored attachment reference alone.
    pub fn update<R: FinanceRecord>(
        &mut self,
        id: &RecordId,
        record: R,
        attachment: AttachmentChange<'_>,
    ) -> FintrackResult<()> {
        record
            .validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        let before = self
            .collections
            .find(R::KIND, id)
            .ok_or_else(|| FintrackError::record_not_found(R::KIND, id.as_str()))?;

        let record: Record = record.into();
        self.gateway.update(id, record.clone(), attachment)?;
        self.sync();

        let after = self.collections.find(R::KIND, id).unwrap_or(record);
        self.log(|owner| AuditEntry::update(id.as_str(), owner, &before, &after))
    }

    pub fn delete(&mut self, kind: RecordKind, id: &RecordId) -> FintrackResult<()> {
        let before = self
            .collections
            .find(kind, id)
            .ok_or_else(|| FintrackError::record_not_found(kind, id.as_str()))?;

        self.gateway.delete(kind, id)?;
        self.sync();

        self.log(|owner| AuditEntry::delete(id.as_str(), owner, &before))
    }

    /// Resolve a full id or a unique id prefix to a stored record id
    pub fn resolve_id(&self, kind: RecordKind, input: &str) -> FintrackResult<RecordId> {
        let input = input.trim();
        let ids = self.ids(kind);

        if let Some(exact) = ids.iter().find(|id| id.as_str() == input) {
            return Ok((*exact).clone());
        }

        let matches: Vec<&RecordId> = ids
            .into_iter()
            .filter(|id| !input.is_empty() && id.as_str().starts_with(input))
            .collect();
        match matches.as_slice() {
            [only] => Ok((*only).clone()),
            [] => Err(FintrackError::record_not_found(kind, input)),
            _ => Err(FintrackError::Validation(format!(
                "'{}' matches {} {} records; use a longer id",
                input,
                matches.len(),
                kind.label().to_lowercase()
            ))),
        }
    }

    /// Detach from the gateway's feed
    pub fn close(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    fn ids(&self, kind: RecordKind) -> Vec<&RecordId> {
        let c = &self.collections;
        match kind {
            RecordKind::Income => c.incomes.iter().filter_map(|r| r.id()).collect(),
            RecordKind::Expense => c.expenses.iter().filter_map(|r| r.id()).collect(),
            RecordKind::Reminder => c.reminders.iter().filter_map(|r| r.id()).collect(),
            RecordKind::Saving => c.savings.iter().filter_map(|r| r.id()).collect(),
        }
    }

    fn log<F>(&self, entry: F) -> FintrackResult<()>
    where
        F: FnOnce(String) -> AuditEntry,
    {
        match &self.audit {
            Some(audit) => audit.log(&entry(self.identity().uid().to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::FintrackPaths;
    use crate::gateway::{
        LocalGateway, MemoryAttachmentStore, MemoryDocumentStore, RemoteGateway,
    };
    use crate::models::{Expense, Income, Reminder, Saving};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn local_store(temp_dir: &TempDir) -> RecordStore {
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let gw = LocalGateway::open(&paths, Identity::Guest).unwrap();
        RecordStore::open(Box::new(gw))
            .unwrap()
            .with_audit(AuditLogger::new(paths.audit_log()))
    }

    fn remote_parts() -> (Arc<MemoryDocumentStore>, Arc<MemoryAttachmentStore>) {
        (
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryAttachmentStore::new("https://files.example.com")),
        )
    }

    fn remote_store(docs: &Arc<MemoryDocumentStore>, files: &Arc<MemoryAttachmentStore>) -> RecordStore {
        let gw = RemoteGateway::new(
            Identity::from_uid(Some("alice")),
            docs.clone(),
            files.clone(),
        );
        RecordStore::open(Box::new(gw)).unwrap()
    }

    #[test]
    fn test_local_add_is_visible_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);

        let id = store
            .add(Income::new("2024-01-05", "Job", 50000.0), None)
            .unwrap();
        assert_eq!(store.list::<Income>().len(), 1);
        assert_eq!(store.get::<Income>(&id).unwrap().source, "Job");
        assert_eq!(store.mode(), BackendMode::Local);
    }

    #[test]
    fn test_newest_record_first() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);
        store.add(Income::new("2024-01-05", "First", 1.0), None).unwrap();
        store.add(Income::new("2024-01-01", "Second", 1.0), None).unwrap();

        assert_eq!(store.list::<Income>()[0].source, "Second");
    }

    #[test]
    fn test_invalid_record_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);

        let err = store.add(Expense::new("", "Rent", 1.0), None).unwrap_err();
        assert!(err.is_validation());
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_unpadded_date_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);

        let err = store.add(Income::new("2024-1-5", "Job", 100.0), None).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("2024-1-5"));
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_update_delete_and_audit_trail() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut store = local_store(&temp_dir);

        let id = store.add(Saving::new("Emergency", 100.0), None).unwrap();
        store
            .update(
                &id,
                Saving::new("Emergency", 250.0).with_date("2024-03-01"),
                AttachmentChange::Keep,
            )
            .unwrap();
        assert_eq!(store.get::<Saving>(&id).unwrap().amount, 250.0);

        store.delete(RecordKind::Saving, &id).unwrap();
        assert!(store.list::<Saving>().is_empty());

        let entries = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, [Operation::Create, Operation::Update, Operation::Delete]);
        assert!(entries[1].diff_summary.as_deref().unwrap().contains("amount"));
        assert_eq!(entries[0].owner, "guest");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);
        let missing = RecordId::from_string("missing");

        assert!(store
            .update(&missing, Reminder::new("Rent", "2024-02-01"), AttachmentChange::Keep)
            .unwrap_err()
            .is_not_found());
        assert!(store
            .delete(RecordKind::Reminder, &missing)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = local_store(&temp_dir);
        let id = store.add(Reminder::new("Rent", "2024-02-01"), None).unwrap();

        assert_eq!(store.resolve_id(RecordKind::Reminder, id.as_str()).unwrap(), id);
        assert_eq!(store.resolve_id(RecordKind::Reminder, id.short()).unwrap(), id);
        assert!(store
            .resolve_id(RecordKind::Income, id.short())
            .unwrap_err()
            .is_not_found());
        assert!(store.resolve_id(RecordKind::Reminder, "").is_err());
    }

    #[test]
    fn test_remote_state_follows_snapshots() {
        let (docs, files) = remote_parts();
        let mut store = remote_store(&docs, &files);

        store.add(Income::new("2024-01-05", "Job", 1.0), None).unwrap();
        assert_eq!(store.list::<Income>()[0].uid.as_deref(), Some("alice"));
        assert_eq!(store.mode(), BackendMode::Remote);

        // A second session writing for the same user shows up on sync
        let other = RemoteGateway::new(Identity::from_uid(Some("alice")), docs.clone(), files.clone());
        other
            .create(Income::new("2024-02-05", "Bonus", 2.0).into(), None)
            .unwrap();
        other
            .create(Income::new("2024-03-05", "Gift", 3.0).into(), None)
            .unwrap();

        assert_eq!(store.sync(), 2);
        let sources: Vec<_> = store.list::<Income>().iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, ["Gift", "Bonus", "Job"]);
        assert_eq!(store.sync(), 0);
    }

    #[test]
    fn test_remote_failure_leaves_state_unchanged() {
        let (docs, files) = remote_parts();
        let mut store = remote_store(&docs, &files);
        store.add(Expense::new("2024-01-10", "Rent", 1.0), None).unwrap();

        docs.set_offline(true);
        let err = store
            .add(Expense::new("2024-01-11", "Food", 2.0), None)
            .unwrap_err();
        assert!(matches!(err, FintrackError::Remote(_)));
        assert_eq!(store.list::<Expense>().len(), 1);

        files.set_offline(true);
        docs.set_offline(false);
        let attachment = Attachment::new("r.pdf", b"x".to_vec());
        assert!(store
            .add(Expense::new("2024-01-11", "Food", 2.0), Some(&attachment))
            .is_err());
        assert_eq!(store.list::<Expense>().len(), 1);
    }

    #[test]
    fn test_close_detaches_from_feed() {
        let (docs, files) = remote_parts();
        let store = remote_store(&docs, &files);
        store.close();

        // Writes after close still succeed; nobody is listening
        let gw = RemoteGateway::new(Identity::from_uid(Some("alice")), docs.clone(), files);
        gw.create(Saving::new("Fund", 1.0).into(), None).unwrap();
        assert_eq!(docs.count(RecordKind::Saving), 1);
    }
}
