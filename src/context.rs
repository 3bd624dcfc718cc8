//! Shared state handed to every operation.

use crate::notify::Notifier;
use crate::store::DocumentStore;

/// Everything an operation needs: the live document store and the channel
/// user-facing feedback goes through. Cheap to clone; both halves are
/// handles onto shared state.
#[derive(Clone, Debug)]
pub struct ClinicContext {
    /// Live document store.
    pub store: DocumentStore,
    /// Feedback channel to the active view.
    pub notify: Notifier,
}

impl ClinicContext {
    /// Bundles a store and a notification channel into a context.
    #[must_use]
    pub const fn new(store: DocumentStore, notify: Notifier) -> Self {
        Self { store, notify }
    }
}
