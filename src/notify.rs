//! User-facing notification channel.
//!
//! Core operations report outcomes as `(message, severity)` events over an
//! unbounded channel. The view layer owns the receiving half and decides how
//! and when to display events; the core never blocks on delivery.

use tokio::sync::mpsc;

/// Display severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The operation completed.
    Success,
    /// The operation was rejected or failed.
    Error,
    /// Advisory condition that needs no action.
    Warning,
}

/// A single user-facing event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Human-readable message.
    pub message: String,
    /// Display severity.
    pub severity: Severity,
}

/// Sending half of the notification channel, handed to every operation.
///
/// Cloning is cheap; all clones feed the same receiver.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a notifier together with the receiving half for the view layer.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emits a notification. A disconnected receiver drops the event silently;
    /// a closed view is not an error for the core.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        let _ = self.tx.send(Notification {
            message: message.into(),
            severity,
        });
    }

    /// Emits a [`Severity::Success`] event.
    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    /// Emits a [`Severity::Error`] event.
    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }

    /// Emits a [`Severity::Warning`] event.
    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Severity::Warning, message);
    }
}
