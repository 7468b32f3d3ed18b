//! Local records gateway
//!
//! Guest and offline mode. Every mutation is applied to the identity's JSON
//! blob immediately and then published to subscribers, so callers see their
//! change as soon as the call returns.

use std::sync::Arc;

use log::debug;

use crate::config::FintrackPaths;
use crate::error::{FintrackError, FintrackResult};
use crate::feed::{SnapshotHub, Subscription};
use crate::models::{Identity, Record, RecordId, RecordKind};
use crate::storage::RecordsRepository;

use super::attachment::{
    upload_path, Attachment, AttachmentChange, AttachmentStore, DirAttachmentStore,
};
use super::{BackendMode, RecordsGateway};

pub struct LocalGateway {
    identity: Identity,
    repo: RecordsRepository,
    attachments: Arc<dyn AttachmentStore>,
    hub: SnapshotHub,
}

impl LocalGateway {
    /// Open the blob for `identity` under the configured data directory
    pub fn open(paths: &FintrackPaths, identity: Identity) -> FintrackResult<Self> {
        let repo = RecordsRepository::new(paths.records_file(&identity));
        repo.load()?;
        debug!(
            "opened local records for {} at {}",
            identity,
            repo.path().display()
        );

        let attachments = Arc::new(DirAttachmentStore::new(paths.attachments_dir()));
        Ok(Self::with_parts(identity, repo, attachments))
    }

    pub fn with_parts(
        identity: Identity,
        repo: RecordsRepository,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        Self {
            identity,
            repo,
            attachments,
            hub: SnapshotHub::new(),
        }
    }

    fn store_attachment(&self, record: &mut Record, attachment: &Attachment) -> FintrackResult<()> {
        let path = upload_path(record.kind(), self.identity.uid(), attachment)?;
        let url = self.attachments.put(&path, &attachment.bytes)?;
        if let Some(slot) = record.attachment_url_mut() {
            *slot = Some(url);
        }
        Ok(())
    }

    fn publish(&self, kind: RecordKind) -> FintrackResult<()> {
        let snapshot = self.repo.get_all()?.snapshot(kind);
        self.hub.publish(snapshot);
        Ok(())
    }
}

impl RecordsGateway for LocalGateway {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Local
    }

    fn subscribe(&self) -> FintrackResult<Subscription> {
        let current = self.repo.get_all()?;
        let initial = RecordKind::ALL
            .iter()
            .map(|kind| current.snapshot(*kind))
            .collect();
        Ok(self.hub.subscribe(initial))
    }

    fn create(&self, mut record: Record, attachment: Option<&Attachment>) -> FintrackResult<RecordId> {
        if let Some(attachment) = attachment {
            self.store_attachment(&mut record, attachment)?;
        }

        let id = RecordId::new();
        record.set_id(id.clone());
        let kind = record.kind();

        self.repo.update(|c| {
            c.prepend(record);
            Ok(())
        })?;
        self.publish(kind)?;
        Ok(id)
    }

    fn update(
        &self,
        id: &RecordId,
        mut record: Record,
        attachment: AttachmentChange<'_>,
    ) -> FintrackResult<()> {
        let kind = record.kind();
        if self.repo.get_all()?.find(kind, id).is_none() {
            return Err(FintrackError::record_not_found(kind, id.as_str()));
        }

        if let AttachmentChange::Replace(attachment) = attachment {
            self.store_attachment(&mut record, attachment)?;
        }
        record.set_id(id.clone());

        self.repo.update(|c| {
            let mut existing = c
                .find(kind, id)
                .ok_or_else(|| FintrackError::record_not_found(kind, id.as_str()))?;
            attachment.settle(&mut record, &mut existing);
            record.set_uid(existing.uid().map(str::to_string));
            c.replace(record);
            Ok(())
        })?;
        self.publish(kind)
    }

    fn delete(&self, kind: RecordKind, id: &RecordId) -> FintrackResult<()> {
        self.repo.update(|c| {
            c.remove(kind, id)
                .map(|_| ())
                .ok_or_else(|| FintrackError::record_not_found(kind, id.as_str()))
        })?;
        self.publish(kind)
    }
}
