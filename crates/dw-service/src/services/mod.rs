//! Engagement and analytics services
//!
//! This module contains the reaction controller, the analytics service and
//! the plumbing they share: context, errors, notices and write ordering.

pub mod analytics;
pub mod context;
pub mod engagement;
pub mod error;
pub mod notifier;
pub mod sequencing;

// Re-export all services for convenience
pub use analytics::{AnalyticsService, AnalyticsSource};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use engagement::{IntentOutcome, ReactionController, ReactionSnapshot};
pub use error::{ServiceError, ServiceResult};
pub use notifier::{BroadcastNotifier, Notice, NoticeLevel, Notifier, Signal, TracingNotifier};
pub use sequencing::{IntentSequence, SlotKey, WriteSlot, WriteSlots};
