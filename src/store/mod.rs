//! Document ownership, storage backends, and the auto-save engine.
//!
//! [`DocumentStore`] is the sole mutation gateway to the in-memory document:
//! reads clone a collection out, writes replace it wholesale and bump a
//! generation counter that the auto-save engine watches. Keeping every
//! mutation on this one path is what keeps memory and persisted state from
//! diverging.

pub mod backend;
pub mod document;
pub mod engine;
pub mod snapshot;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use document::{CURRENCY, DOCUMENT_VERSION, Document};
pub use engine::{AutosaveConfig, AutosaveEngine, save_document};
pub use snapshot::{SnapshotArtifact, SnapshotKind, export_snapshot};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::entities::{Invoice, Service, SystemInfo, User};

/// Storage key holding the JSON-encoded document.
pub const DB_KEY: &str = "ijaz_clinic_auto_db";

/// Storage key holding the last-saved timestamp string.
pub const LAST_SAVED_KEY: &str = "ijaz_clinic_last_saved";

/// How the document came up at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A persisted document was read and parsed.
    Loaded,
    /// No persisted document existed; the default seed is in memory.
    Fresh,
    /// A persisted payload existed but could not be read or parsed; the
    /// default seed replaced it.
    Recovered,
}

/// Owner of the in-memory document and sole mutation gateway.
///
/// Cloning shares the same document; there is never a second copy that could
/// diverge from the persisted mirror.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    inner: Arc<Mutex<Document>>,
    changes: watch::Sender<u64>,
}

impl DocumentStore {
    /// Opens the store over `backend`.
    ///
    /// Reads the persisted document if one exists. A missing document seeds
    /// the defaults; an unreadable or unparseable one is logged and replaced
    /// by the defaults. Load failures never propagate to the caller.
    pub async fn open(backend: &dyn StorageBackend) -> (Self, LoadOutcome) {
        let now = Utc::now();
        let (document, outcome) = match backend.get(DB_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<Document>(&payload) {
                Ok(document) => {
                    info!(records = document.record_count(), "document loaded");
                    (document, LoadOutcome::Loaded)
                }
                Err(e) => {
                    warn!("persisted document failed to parse, falling back to defaults: {e}");
                    (Document::default_seed(now), LoadOutcome::Recovered)
                }
            },
            Ok(None) => {
                info!("no persisted document found, seeding defaults");
                (Document::default_seed(now), LoadOutcome::Fresh)
            }
            Err(e) => {
                warn!("persisted document could not be read, falling back to defaults: {e}");
                (Document::default_seed(now), LoadOutcome::Recovered)
            }
        };

        let (changes, _) = watch::channel(0);
        let store = Self {
            inner: Arc::new(Mutex::new(document)),
            changes,
        };
        (store, outcome)
    }

    /// Current user accounts.
    pub async fn users(&self) -> Vec<User> {
        self.inner.lock().await.users.clone()
    }

    /// Replaces the user collection and signals a pending save.
    pub async fn set_users(&self, users: Vec<User>) {
        self.inner.lock().await.users = users;
        self.mark_changed();
    }

    /// Current service catalog.
    pub async fn services(&self) -> Vec<Service> {
        self.inner.lock().await.services.clone()
    }

    /// Replaces the service catalog and signals a pending save.
    pub async fn set_services(&self, services: Vec<Service>) {
        self.inner.lock().await.services = services;
        self.mark_changed();
    }

    /// Current invoices in creation order.
    pub async fn invoices(&self) -> Vec<Invoice> {
        self.inner.lock().await.invoices.clone()
    }

    /// Replaces the invoice collection and signals a pending save.
    pub async fn set_invoices(&self, invoices: Vec<Invoice>) {
        self.inner.lock().await.invoices = invoices;
        self.mark_changed();
    }

    /// Current metadata block.
    pub async fn system_info(&self) -> SystemInfo {
        self.inner.lock().await.system_info.clone()
    }

    /// Replaces the metadata block and signals a pending save.
    pub async fn set_system_info(&self, info: SystemInfo) {
        self.inner.lock().await.system_info = info;
        self.mark_changed();
    }

    /// Clones the entire document (save and snapshot paths).
    pub async fn document(&self) -> Document {
        self.inner.lock().await.clone()
    }

    /// Total records across the three collections.
    pub async fn record_count(&self) -> usize {
        self.inner.lock().await.record_count()
    }

    /// Change-signal receiver for the auto-save engine. The value is a
    /// generation counter; only its movement matters.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Rewrites `systemInfo.lastUpdated` without signaling a change.
    ///
    /// Save path only: a save stamping its own timestamp must not
    /// reschedule itself.
    pub(crate) async fn stamp_last_updated(&self, at: DateTime<Utc>) {
        self.inner.lock().await.system_info.last_updated = at;
    }

    fn mark_changed(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Result;

    #[tokio::test]
    async fn test_open_fresh_seeds_defaults() {
        let backend = MemoryBackend::new();
        let (store, outcome) = DocumentStore::open(&backend).await;

        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!(store.users().await.len(), 2);
        assert_eq!(store.services().await.len(), 67);
        assert!(store.invoices().await.is_empty());
        assert_eq!(store.record_count().await, 69);
    }

    #[tokio::test]
    async fn test_open_recovers_from_corrupt_payload() -> Result<()> {
        let backend = MemoryBackend::new();
        backend.set(DB_KEY, "{not valid json").await?;

        let (store, outcome) = DocumentStore::open(&backend).await;

        assert_eq!(outcome, LoadOutcome::Recovered);
        // Defaults are in memory; the corrupt payload did not propagate.
        assert_eq!(store.services().await.len(), 67);

        Ok(())
    }

    #[tokio::test]
    async fn test_setters_bump_generation() {
        let backend = MemoryBackend::new();
        let (store, _) = DocumentStore::open(&backend).await;
        let changes = store.subscribe();

        assert_eq!(*changes.borrow(), 0);

        store.set_users(store.users().await).await;
        assert_eq!(*changes.borrow(), 1);

        store.set_services(store.services().await).await;
        store.set_invoices(Vec::new()).await;
        assert_eq!(*changes.borrow(), 3);
    }

    #[tokio::test]
    async fn test_stamp_last_updated_is_silent() {
        let backend = MemoryBackend::new();
        let (store, _) = DocumentStore::open(&backend).await;
        let changes = store.subscribe();

        store.stamp_last_updated(Utc::now()).await;

        assert_eq!(*changes.borrow(), 0);
    }

    #[tokio::test]
    async fn test_save_then_open_round_trips() -> Result<()> {
        let backend = MemoryBackend::new();
        let (store, _) = DocumentStore::open(&backend).await;

        // Mutate so the persisted copy is not just the seed.
        let mut services = store.services().await;
        services[0].price = 650.0;
        store.set_services(services).await;

        save_document(&store, &backend).await?;
        let before = store.document().await;

        let (reopened, outcome) = DocumentStore::open(&backend).await;
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reopened.document().await, before);

        Ok(())
    }

    #[tokio::test]
    async fn test_save_writes_both_keys() -> Result<()> {
        let backend = MemoryBackend::new();
        let (store, _) = DocumentStore::open(&backend).await;

        save_document(&store, &backend).await?;

        assert!(backend.get(DB_KEY).await?.is_some());
        let stamp = backend.get(LAST_SAVED_KEY).await?.unwrap();
        // RFC 3339 with millisecond precision and a Z suffix.
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());

        Ok(())
    }
}
