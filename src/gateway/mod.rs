//! Records gateway
//!
//! A gateway is the single seam between the record store and where records
//! actually live. Guests (and users without a configured backend) get the
//! local JSON gateway; authenticated users with remote settings get the
//! document-store gateway.

pub mod attachment;
pub mod local;
pub mod remote;

use std::fmt;
use std::sync::Arc;

use log::{info, warn};

use crate::config::{FintrackPaths, Settings};
use crate::error::FintrackResult;
use crate::feed::Subscription;
use crate::models::{Identity, Record, RecordId, RecordKind};

pub use attachment::{
    upload_path, Attachment, AttachmentChange, AttachmentStore, DirAttachmentStore,
    MemoryAttachmentStore,
};
pub use local::LocalGateway;
pub use remote::{DocumentStore, MemoryDocumentStore, RemoteGateway};

/// Which backend a gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Local,
    Remote,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Persistence and change notification for one identity's records
pub trait RecordsGateway: Send + Sync {
    fn identity(&self) -> &Identity;

    fn mode(&self) -> BackendMode;

    /// Subscribe to full-collection snapshots
    ///
    /// The current state of every collection is delivered first.
    fn subscribe(&self) -> FintrackResult<Subscription>;

    /// Store a new record, uploading its attachment first if one is given
    fn create(&self, record: Record, attachment: Option<&Attachment>) -> FintrackResult<RecordId>;

    /// Replace the record stored under `id`
    fn update(
        &self,
        id: &RecordId,
        record: Record,
        attachment: AttachmentChange<'_>,
    ) -> FintrackResult<()>;

    fn delete(&self, kind: RecordKind, id: &RecordId) -> FintrackResult<()>;
}

/// Connected remote collaborators
#[derive(Clone)]
pub struct RemoteBackend {
    pub documents: Arc<dyn DocumentStore>,
    pub attachments: Arc<dyn AttachmentStore>,
}

impl RemoteBackend {
    pub fn new(documents: Arc<dyn DocumentStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self {
            documents,
            attachments,
        }
    }
}

/// Choose the gateway for `identity`
///
/// Remote storage is used only for an authenticated user when the remote
/// settings are complete and a backend is available; everything else falls
/// back to local storage.
pub fn open_gateway(
    paths: &FintrackPaths,
    settings: &Settings,
    identity: Identity,
    backend: Option<RemoteBackend>,
) -> FintrackResult<Box<dyn RecordsGateway>> {
    if identity.is_guest() {
        return Ok(Box::new(LocalGateway::open(paths, identity)?));
    }

    if !settings.remote.is_configured() {
        info!("remote settings incomplete, keeping {} local", identity);
        return Ok(Box::new(LocalGateway::open(paths, identity)?));
    }

    match backend {
        Some(backend) => Ok(Box::new(RemoteGateway::new(
            identity,
            backend.documents,
            backend.attachments,
        ))),
        None => {
            warn!("no remote backend available, keeping {} local", identity);
            Ok(Box::new(LocalGateway::open(paths, identity)?))
        }
    }
}
