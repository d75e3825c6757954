//! User-facing notices and event fan-out
//!
//! The controller never returns engagement failures to its caller; it rolls
//! back and reports through a [`Notifier`] instead.

use std::fmt;

use dw_core::{DomainError, DomainEvent};
use serde::Serialize;
use tokio::sync::broadcast;

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Rejections of user input are warnings; store failures are errors
    pub fn for_error(err: &DomainError) -> Self {
        if err.is_validation() || err.is_not_found() || err.is_conflict() {
            Self::Warning
        } else {
            Self::Error
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Transient message for the member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            code,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Notice for a failed engagement action
    pub fn from_error(err: &DomainError) -> Self {
        let message = match err {
            DomainError::PostNotFound(_) => "This post is no longer available",
            DomainError::UnsupportedGlyph(_) => "That emoji can't be used as a reaction",
            DomainError::ReactionAlreadyExists => "Your reaction changed elsewhere; showing the latest",
            DomainError::RollbackInconsistency(_) => "Your reaction could not be restored; reloading",
            DomainError::ReactionFetch(_) => "Couldn't load reactions",
            DomainError::Timeout { .. } => "Saving your reaction took too long",
            _ => "Couldn't save your reaction",
        };
        Self::new(NoticeLevel::for_error(err), err.code(), message).with_detail(err.to_string())
    }
}

/// Sink for notices and domain events
pub trait Notifier: Send + Sync {
    fn notice(&self, notice: Notice);

    fn event(&self, _event: &DomainEvent) {}
}

/// Writes notices and events to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notice(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(code = notice.code, detail = ?notice.detail, "{}", notice.message),
            NoticeLevel::Warning => tracing::warn!(code = notice.code, detail = ?notice.detail, "{}", notice.message),
            NoticeLevel::Error => tracing::error!(code = notice.code, detail = ?notice.detail, "{}", notice.message),
        }
    }

    fn event(&self, event: &DomainEvent) {
        tracing::debug!(event_type = event.event_type(), post_id = %event.post_id(), "Domain event");
    }
}

/// Anything a listener can receive from a [`BroadcastNotifier`]
#[derive(Debug, Clone)]
pub enum Signal {
    Notice(Notice),
    Event(DomainEvent),
}

/// Fans notices and events out to any number of subscribers
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Signal>,
}

impl BroadcastNotifier {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn send(&self, signal: Signal) {
        // No subscribers is fine
        let _ = self.sender.send(signal);
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Notifier for BroadcastNotifier {
    fn notice(&self, notice: Notice) {
        self.send(Signal::Notice(notice));
    }

    fn event(&self, event: &DomainEvent) {
        self.send(Signal::Event(event.clone()));
    }
}
