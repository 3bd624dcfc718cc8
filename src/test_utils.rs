//! Shared test utilities for the clinic ledger.
//!
//! This module provides common helper functions for setting up seeded stores,
//! notification channels, and auto-save engines, plus storage backends with
//! observable or failing behavior.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};

use crate::context::ClinicContext;
use crate::entities::{Invoice, ServiceLine};
use crate::errors::{Error, Result};
use crate::notify::{Notification, Notifier};
use crate::store::{
    AutosaveConfig, AutosaveEngine, DB_KEY, DocumentStore, MemoryBackend, StorageBackend,
};

/// Creates a store seeded with the default document over a throwaway
/// in-memory backend. This is the standard setup for core-operation tests.
pub async fn setup_store() -> DocumentStore {
    let backend = MemoryBackend::new();
    let (store, _) = DocumentStore::open(&backend).await;
    store
}

/// Creates a seeded context plus the receiving end of its notification
/// channel, so tests can assert on emitted messages.
pub async fn setup_context() -> (ClinicContext, mpsc::UnboundedReceiver<Notification>) {
    let store = setup_store().await;
    let (notify, events) = Notifier::channel();
    (ClinicContext::new(store, notify), events)
}

/// Spawns an auto-save engine over a seeded store and a recording backend.
///
/// # Defaults
/// * config: 2 s debounce, 30 s periodic (the production timings)
pub async fn setup_engine() -> (
    DocumentStore,
    Arc<RecordingBackend>,
    AutosaveEngine,
    mpsc::UnboundedReceiver<Notification>,
) {
    let backend = Arc::new(RecordingBackend::new());
    let (store, _) = DocumentStore::open(backend.as_ref()).await;
    let (notify, events) = Notifier::channel();
    let engine = AutosaveEngine::start(
        store.clone(),
        Arc::clone(&backend) as Arc<dyn StorageBackend>,
        notify,
        AutosaveConfig::default(),
    );
    (store, backend, engine, events)
}

/// Creates a test invoice with sensible defaults.
///
/// # Arguments
/// * `id` - Invoice id (also used for the invoice number)
/// * `patient_name` - Patient the invoice is billed to
/// * `total_amount` - Total, mirrored into the single service line
/// * `created_at` - Creation timestamp
///
/// # Defaults
/// * `invoice_number`: `"INV-{id}"`
/// * optional patient fields: None
/// * `services`: one line, "X ray", priced at the total
/// * `created_by`: `"moavia"`
pub fn make_invoice(
    id: i64,
    patient_name: &str,
    total_amount: f64,
    created_at: DateTime<Utc>,
) -> Invoice {
    Invoice {
        id,
        invoice_number: format!("INV-{id}"),
        patient_name: patient_name.to_string(),
        patient_phone: None,
        patient_age: None,
        patient_gender: None,
        patient_address: None,
        services: vec![ServiceLine {
            id: 1,
            name: "X ray".to_string(),
            price: total_amount,
        }],
        total_amount,
        created_by: "moavia".to_string(),
        created_at,
    }
}

/// Collects every notification currently sitting in the channel.
pub fn drain(events: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = events.try_recv() {
        out.push(notification);
    }
    out
}

/// Yields a few times so spawned workers observe pending signals.
/// Paused-clock tests call this before and after advancing time.
pub async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// In-memory backend that counts document writes, for asserting how many
/// times the auto-save actually fired.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    values: Mutex<HashMap<String, String>>,
    document_writes: AtomicUsize,
}

impl RecordingBackend {
    /// Creates an empty recording backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed writes to the document key.
    #[must_use]
    pub fn document_writes(&self) -> usize {
        self.document_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for RecordingBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if key == DB_KEY {
            self.document_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// Backend whose writes always fail, for exercising save error paths.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage {
            message: "storage quota exceeded".to_string(),
        })
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
