//! Attachment storage
//!
//! An `AttachmentStore` takes bytes at a path and hands back a URL that can
//! later be used to retrieve them. Invoice and receipt uploads go through it
//! before the owning record is written.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use log::debug;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{Record, RecordKind};
use crate::storage::file_io::write_bytes_atomic;

/// A file the user attached to an income or expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an attachment from disk
    pub fn from_path(path: &Path) -> FintrackResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            FintrackError::Attachment(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                FintrackError::Attachment(format!("{} has no file name", path.display()))
            })?;
        Ok(Self { file_name, bytes })
    }
}

/// What an update does to a record's attachment reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachmentChange<'a> {
    /// Keep the reference already on file
    #[default]
    Keep,
    /// Upload new bytes and reference them
    Replace(&'a Attachment),
    /// Drop the reference
    Remove,
}

impl<'a> From<Option<&'a Attachment>> for AttachmentChange<'a> {
    fn from(attachment: Option<&'a Attachment>) -> Self {
        attachment.map_or(Self::Keep, Self::Replace)
    }
}

impl AttachmentChange<'_> {
    /// Settle `record`'s reference against the stored `existing` record,
    /// after any upload for `Replace` has filled it in
    pub(crate) fn settle(&self, record: &mut Record, existing: &mut Record) {
        let (Some(new_slot), Some(old_slot)) =
            (record.attachment_url_mut(), existing.attachment_url_mut())
        else {
            return;
        };
        match self {
            Self::Keep if new_slot.is_none() => *new_slot = old_slot.take(),
            Self::Remove => *new_slot = None,
            _ => {}
        }
    }
}

/// Storage path for an upload: `<folder>/<uid>/<millis>-<file name>`
///
/// Fails for record kinds that do not take attachments.
pub fn upload_path(kind: RecordKind, uid: &str, attachment: &Attachment) -> FintrackResult<String> {
    let folder = kind.attachment_folder().ok_or_else(|| {
        FintrackError::Validation(format!("{} records do not take attachments", kind))
    })?;
    Ok(format!(
        "{}/{}/{}-{}",
        folder,
        uid,
        Utc::now().timestamp_millis(),
        attachment.file_name
    ))
}

/// Store bytes at a path and return a retrievable URL
pub trait AttachmentStore: Send + Sync {
    fn put(&self, path: &str, bytes: &[u8]) -> FintrackResult<String>;
}

/// Attachments kept as files under a local directory, referenced by `file://` URLs
pub struct DirAttachmentStore {
    root: PathBuf,
}

impl DirAttachmentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> FintrackResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(FintrackError::Attachment(format!(
                "Invalid attachment path: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl AttachmentStore for DirAttachmentStore {
    fn put(&self, path: &str, bytes: &[u8]) -> FintrackResult<String> {
        let target = self.resolve(path)?;
        write_bytes_atomic(&target, bytes)
            .map_err(|e| FintrackError::Attachment(e.to_string()))?;

        let absolute = fs::canonicalize(&target).unwrap_or(target);
        debug!("stored attachment at {}", absolute.display());
        Ok(format!("file://{}", absolute.display()))
    }
}

/// In-memory attachment store serving URLs under a base URL
pub struct MemoryAttachmentStore {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    offline: Mutex<bool>,
}

impl MemoryAttachmentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
            offline: Mutex::new(false),
        }
    }

    /// Make subsequent uploads fail, as an unreachable bucket would
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap_or_else(PoisonError::into_inner) = offline;
    }

    /// Stored bytes for a path
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttachmentStore for MemoryAttachmentStore {
    fn put(&self, path: &str, bytes: &[u8]) -> FintrackResult<String> {
        if *self.offline.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(FintrackError::Attachment(format!(
                "Upload of {} failed: storage unreachable",
                path
            )));
        }
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), bytes.to_vec());
        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_path_layout() {
        let attachment = Attachment::new("bill.pdf", vec![1, 2, 3]);
        let path = upload_path(RecordKind::Expense, "alice", &attachment).unwrap();
        assert!(path.starts_with("receipts/alice/"));
        assert!(path.ends_with("-bill.pdf"));

        let path = upload_path(RecordKind::Income, "alice", &attachment).unwrap();
        assert!(path.starts_with("invoices/alice/"));

        let err = upload_path(RecordKind::Reminder, "alice", &attachment).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_dir_store_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirAttachmentStore::new(temp_dir.path().to_path_buf());

        let url = store.put("receipts/guest/1-r.png", b"png").unwrap();
        assert!(url.starts_with("file://"));
        assert_eq!(
            fs::read(temp_dir.path().join("receipts/guest/1-r.png")).unwrap(),
            b"png"
        );
    }

    #[test]
    fn test_dir_store_rejects_escaping_paths() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirAttachmentStore::new(temp_dir.path().to_path_buf());
        assert!(store.put("../outside.txt", b"x").is_err());
        assert!(store.put("/etc/passwd", b"x").is_err());
    }

    #[test]
    fn test_memory_store_urls_and_failure() {
        let store = MemoryAttachmentStore::new("https://files.example.com/");
        let url = store.put("invoices/u1/5-inv.pdf", b"pdf").unwrap();
        assert_eq!(url, "https://files.example.com/invoices/u1/5-inv.pdf");
        assert_eq!(store.object("invoices/u1/5-inv.pdf").unwrap(), b"pdf");

        store.set_offline(true);
        assert!(matches!(
            store.put("invoices/u1/6-inv.pdf", b"pdf"),
            Err(FintrackError::Attachment(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_attachment_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("receipt.jpg");
        fs::write(&path, b"jpeg").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.file_name, "receipt.jpg");
        assert_eq!(attachment.bytes, b"jpeg");
        assert!(Attachment::from_path(&temp_dir.path().join("missing")).is_err());
    }
}
