//! Remote records gateway
//!
//! Authenticated mode. Records live in a `DocumentStore` as JSON documents
//! stamped with the owner's `uid` and a `createdAt` timestamp; attachments are
//! uploaded to an `AttachmentStore` before the document is written. Local
//! state is never touched directly: the store's watch feed pushes a fresh
//! full snapshot after every change.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::error::{FintrackError, FintrackResult};
use crate::feed::{SnapshotHub, Subscription};
use crate::models::{
    Expense, FinanceRecord, Identity, Income, Record, RecordId, RecordKind, Reminder, Saving,
    Snapshot,
};

use super::attachment::{upload_path, Attachment, AttachmentChange, AttachmentStore};
use super::{BackendMode, RecordsGateway};

/// A document database scoped by collection
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning its newly assigned key
    fn add(&self, kind: RecordKind, doc: Value) -> FintrackResult<String>;

    /// Replace the document stored under `id`
    fn set(&self, kind: RecordKind, id: &str, doc: Value) -> FintrackResult<()>;

    fn get(&self, kind: RecordKind, id: &str) -> FintrackResult<Option<Value>>;

    fn remove(&self, kind: RecordKind, id: &str) -> FintrackResult<()>;

    /// Watch every collection for documents owned by `uid`
    ///
    /// The subscription receives the current state of all four collections
    /// immediately, then one full snapshot of a collection whenever it changes.
    fn watch(&self, uid: &str) -> FintrackResult<Subscription>;
}

#[derive(Default)]
struct MemoryState {
    next_key: u64,
    docs: HashMap<RecordKind, BTreeMap<String, Value>>,
    feeds: HashMap<String, SnapshotHub>,
    offline: bool,
}

/// In-process document store with live snapshot feeds
#[derive(Default)]
pub struct MemoryDocumentStore {
    state: Mutex<MemoryState>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, as a dropped connection would
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Number of documents in a collection, across all owners
    pub fn count(&self, kind: RecordKind) -> usize {
        self.lock().docs.get(&kind).map_or(0, BTreeMap::len)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(state: &MemoryState) -> FintrackResult<()> {
        if state.offline {
            return Err(FintrackError::Remote("document store unreachable".into()));
        }
        Ok(())
    }

    fn notify(state: &MemoryState, kind: RecordKind, doc: &Value) -> FintrackResult<()> {
        let Some(uid) = doc.get("uid").and_then(Value::as_str) else {
            return Ok(());
        };
        if let Some(hub) = state.feeds.get(uid) {
            hub.publish(query(state, kind, uid)?);
        }
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn add(&self, kind: RecordKind, doc: Value) -> FintrackResult<String> {
        let mut state = self.lock();
        Self::check_online(&state)?;

        state.next_key += 1;
        let key = format!("doc-{:06}", state.next_key);
        state
            .docs
            .entry(kind)
            .or_default()
            .insert(key.clone(), doc.clone());
        Self::notify(&state, kind, &doc)?;
        Ok(key)
    }

    fn set(&self, kind: RecordKind, id: &str, doc: Value) -> FintrackResult<()> {
        let mut state = self.lock();
        Self::check_online(&state)?;

        let previous = state
            .docs
            .entry(kind)
            .or_default()
            .insert(id.to_string(), doc.clone());
        Self::notify(&state, kind, &doc)?;
        // Ownership may have moved; refresh the old owner's view too
        if let Some(previous) = previous {
            if previous.get("uid") != doc.get("uid") {
                Self::notify(&state, kind, &previous)?;
            }
        }
        Ok(())
    }

    fn get(&self, kind: RecordKind, id: &str) -> FintrackResult<Option<Value>> {
        let state = self.lock();
        Self::check_online(&state)?;
        Ok(state.docs.get(&kind).and_then(|docs| docs.get(id)).cloned())
    }

    fn remove(&self, kind: RecordKind, id: &str) -> FintrackResult<()> {
        let mut state = self.lock();
        Self::check_online(&state)?;

        let removed = state.docs.get_mut(&kind).and_then(|docs| docs.remove(id));
        if let Some(doc) = removed {
            Self::notify(&state, kind, &doc)?;
        }
        Ok(())
    }

    fn watch(&self, uid: &str) -> FintrackResult<Subscription> {
        let mut state = self.lock();
        Self::check_online(&state)?;

        let initial = RecordKind::ALL
            .iter()
            .map(|kind| query(&state, *kind, uid))
            .collect::<FintrackResult<Vec<_>>>()?;
        let hub = state.feeds.entry(uid.to_string()).or_default();
        Ok(hub.subscribe(initial))
    }
}

/// `where uid == owner order by <sort field>` over one collection
fn query(state: &MemoryState, kind: RecordKind, uid: &str) -> FintrackResult<Snapshot> {
    let empty = BTreeMap::new();
    let docs = state.docs.get(&kind).unwrap_or(&empty);
    let owned = docs
        .iter()
        .filter(|(_, doc)| doc.get("uid").and_then(Value::as_str) == Some(uid));

    Ok(match kind {
        RecordKind::Income => Snapshot::Incomes(typed::<Income>(owned)?),
        RecordKind::Expense => Snapshot::Expenses(typed::<Expense>(owned)?),
        RecordKind::Reminder => Snapshot::Reminders(typed::<Reminder>(owned)?),
        RecordKind::Saving => Snapshot::Savings(typed::<Saving>(owned)?),
    })
}

fn typed<'a, R: FinanceRecord>(
    docs: impl Iterator<Item = (&'a String, &'a Value)>,
) -> FintrackResult<Vec<R>> {
    let mut records = docs
        .map(|(key, doc)| {
            let mut doc = doc.clone();
            if let Value::Object(fields) = &mut doc {
                fields.insert("id".into(), Value::String(key.clone()));
            }
            serde_json::from_value::<R>(doc)
        })
        .collect::<Result<Vec<R>, _>>()?;

    records.sort_by(|a, b| snapshot_order(R::KIND, a.sort_key(), b.sort_key()));
    Ok(records)
}

/// Reminders ascend by due date; everything else descends by date.
/// Records without a sort key go last.
fn snapshot_order(kind: RecordKind, a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if kind.sorts_ascending() => a.cmp(b),
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Gateway backed by a remote document store and attachment store
pub struct RemoteGateway {
    identity: Identity,
    documents: Arc<dyn DocumentStore>,
    attachments: Arc<dyn AttachmentStore>,
}

impl RemoteGateway {
    pub fn new(
        identity: Identity,
        documents: Arc<dyn DocumentStore>,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        info!("using remote records for {}", identity);
        Self {
            identity,
            documents,
            attachments,
        }
    }

    fn upload(&self, record: &mut Record, attachment: &Attachment) -> FintrackResult<()> {
        let path = upload_path(record.kind(), self.identity.uid(), attachment)?;
        let url = self.attachments.put(&path, &attachment.bytes)?;
        debug!("uploaded {} for {}", path, self.identity);
        if let Some(slot) = record.attachment_url_mut() {
            *slot = Some(url);
        }
        Ok(())
    }

    /// The record's fields as a document owned by this gateway's user
    fn to_document(&self, record: &Record, created_at: Value) -> FintrackResult<Value> {
        let mut fields = match record.to_value()? {
            Value::Object(fields) => fields,
            other => {
                return Err(FintrackError::Remote(format!(
                    "record did not serialize to an object: {}",
                    other
                )))
            }
        };
        fields.remove("id");
        fields.insert("uid".into(), Value::String(self.identity.uid().to_string()));
        fields.insert("createdAt".into(), created_at);
        Ok(Value::Object(fields))
    }

    /// Fetch an owned document as a typed record, or `NotFound`
    fn fetch_owned(&self, kind: RecordKind, id: &RecordId) -> FintrackResult<(Record, Map<String, Value>)> {
        let not_found = || FintrackError::record_not_found(kind, id.as_str());
        let doc = self.documents.get(kind, id.as_str())?.ok_or_else(not_found)?;
        let Value::Object(mut fields) = doc else {
            return Err(not_found());
        };
        if fields.get("uid").and_then(Value::as_str) != Some(self.identity.uid()) {
            return Err(not_found());
        }

        let meta = fields.clone();
        fields.insert("id".into(), Value::String(id.as_str().to_string()));
        let value = Value::Object(fields);
        let record = match kind {
            RecordKind::Income => Record::Income(serde_json::from_value(value)?),
            RecordKind::Expense => Record::Expense(serde_json::from_value(value)?),
            RecordKind::Reminder => Record::Reminder(serde_json::from_value(value)?),
            RecordKind::Saving => Record::Saving(serde_json::from_value(value)?),
        };
        Ok((record, meta))
    }
}

impl RecordsGateway for RemoteGateway {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Remote
    }

    fn subscribe(&self) -> FintrackResult<Subscription> {
        self.documents.watch(self.identity.uid())
    }

    fn create(&self, mut record: Record, attachment: Option<&Attachment>) -> FintrackResult<RecordId> {
        if let Some(attachment) = attachment {
            self.upload(&mut record, attachment)?;
        }
        let doc = self.to_document(&record, Value::String(Utc::now().to_rfc3339()))?;
        let key = self.documents.add(record.kind(), doc)?;
        debug!("created {} {} for {}", record.kind(), key, self.identity);
        Ok(RecordId::from_string(key))
    }

    fn update(
        &self,
        id: &RecordId,
        mut record: Record,
        attachment: AttachmentChange<'_>,
    ) -> FintrackResult<()> {
        let kind = record.kind();
        let (mut existing, meta) = self.fetch_owned(kind, id)?;

        if let AttachmentChange::Replace(attachment) = attachment {
            self.upload(&mut record, attachment)?;
        }
        attachment.settle(&mut record, &mut existing);

        let created_at = meta
            .get("createdAt")
            .cloned()
            .unwrap_or_else(|| Value::String(Utc::now().to_rfc3339()));
        let doc = self.to_document(&record, created_at)?;
        self.documents.set(kind, id.as_str(), doc)
    }

    fn delete(&self, kind: RecordKind, id: &RecordId) -> FintrackResult<()> {
        self.fetch_owned(kind, id)?;
        self.documents.remove(kind, id.as_str())
    }
}
