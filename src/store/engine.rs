//! Debounced and periodic auto-save.
//!
//! A single worker task owns both timers. Every store mutation bumps the
//! change signal, which arms (or re-arms) a debounce deadline; an independent
//! interval fires an unconditional backstop save so a pending change can
//! never outlive the process by more than one period. Save failures are
//! reported through the notification channel and never crash the worker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use crate::errors::Result;
use crate::notify::Notifier;
use crate::store::{DB_KEY, DocumentStore, LAST_SAVED_KEY, StorageBackend};

/// Timing knobs for the auto-save worker.
#[derive(Clone, Copy, Debug)]
pub struct AutosaveConfig {
    /// Quiet period after the last change before a debounced save fires.
    pub debounce: Duration,
    /// Unconditional backstop interval.
    pub periodic: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
            periodic: Duration::from_secs(30),
        }
    }
}

/// Serializes the whole document and commits both storage keys.
///
/// `systemInfo.lastUpdated` is stamped first, then the document goes under
/// [`DB_KEY`] and the timestamp string under [`LAST_SAVED_KEY`]. On failure
/// the in-memory collections are untouched; only the pending write is at
/// risk, and the periodic backstop retries it implicitly.
///
/// # Errors
/// Returns serialization or backend errors unchanged.
#[instrument(skip_all)]
pub async fn save_document(
    store: &DocumentStore,
    backend: &dyn StorageBackend,
) -> Result<DateTime<Utc>> {
    let now = Utc::now();
    store.stamp_last_updated(now).await;

    let document = store.document().await;
    let payload = serde_json::to_string(&document)?;
    backend.set(DB_KEY, &payload).await?;

    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    backend.set(LAST_SAVED_KEY, &stamp).await?;

    debug!(bytes = payload.len(), "document saved");
    Ok(now)
}

/// Shared save path for the worker and the manual entry points.
#[derive(Clone)]
struct Saver {
    store: DocumentStore,
    backend: Arc<dyn StorageBackend>,
    notify: Notifier,
    last_saved: watch::Sender<Option<DateTime<Utc>>>,
}

impl Saver {
    async fn save(&self) -> Result<()> {
        let saved_at = save_document(&self.store, self.backend.as_ref()).await?;
        self.last_saved.send_replace(Some(saved_at));
        Ok(())
    }

    /// Timer-path wrapper: failures notify, never propagate.
    async fn save_or_notify(&self) {
        if let Err(e) = self.save().await {
            error!("auto-save failed: {e}");
            self.notify.error(format!("Auto-save failed: {e}"));
        }
    }
}

/// Handle to the auto-save worker task.
///
/// Dropping the handle without [`AutosaveEngine::shutdown`] leaves the worker
/// running until the runtime stops; an orderly exit goes through `shutdown`
/// so the final debounce window is flushed.
pub struct AutosaveEngine {
    saver: Saver,
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<()>,
    last_saved: watch::Receiver<Option<DateTime<Utc>>>,
}

impl AutosaveEngine {
    /// Spawns the worker listening on the store's change signal.
    #[must_use]
    pub fn start(
        store: DocumentStore,
        backend: Arc<dyn StorageBackend>,
        notify: Notifier,
        config: AutosaveConfig,
    ) -> Self {
        let (last_saved_tx, last_saved_rx) = watch::channel(None);
        let saver = Saver {
            store: store.clone(),
            backend,
            notify,
            last_saved: last_saved_tx,
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(
            saver.clone(),
            store.subscribe(),
            shutdown_rx,
            config,
        ));

        Self {
            saver,
            shutdown: shutdown_tx,
            worker,
            last_saved: last_saved_rx,
        }
    }

    /// Immediate save without notifications. Startup uses this to persist a
    /// freshly seeded document.
    ///
    /// # Errors
    /// Returns serialization or backend errors unchanged.
    pub async fn flush(&self) -> Result<()> {
        self.saver.save().await
    }

    /// Immediate save bypassing the debounce, with user feedback on both
    /// outcomes (the manual-save button).
    ///
    /// # Errors
    /// Returns serialization or backend errors unchanged.
    pub async fn save_now(&self) -> Result<()> {
        self.saver
            .save()
            .await
            .inspect(|()| self.saver.notify.success("Database saved manually!"))
            .inspect_err(|e| self.saver.notify.error(format!("Auto-save failed: {e}")))
    }

    /// Most recent successful save, if any.
    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        *self.last_saved.borrow()
    }

    /// Stops both timers, flushing any pending change first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.worker.await {
            error!("auto-save worker did not stop cleanly: {e}");
        }
    }
}

async fn run_worker(
    saver: Saver,
    mut changes: watch::Receiver<u64>,
    mut shutdown: watch::Receiver<bool>,
    config: AutosaveConfig,
) {
    // Also the dirty flag: Some means a change is waiting to be saved.
    let mut deadline: Option<Instant> = None;

    // First periodic tick lands one full period out, not at startup.
    let mut periodic = time::interval_at(Instant::now() + config.periodic, config.periodic);
    periodic.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let debounce_due = async {
            match deadline {
                Some(at) => time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_ok() {
                    deadline = Some(Instant::now() + config.debounce);
                    debug!("change observed, debounce window reset");
                } else {
                    break;
                }
            }
            () = debounce_due => {
                deadline = None;
                saver.save_or_notify().await;
            }
            _ = periodic.tick() => {
                saver.save_or_notify().await;
                // The backstop save covered any pending change.
                deadline = None;
            }
            _ = shutdown.changed() => {
                if deadline.is_some() {
                    saver.save_or_notify().await;
                }
                info!("auto-save worker stopped");
                break;
            }
        }
    }
}
