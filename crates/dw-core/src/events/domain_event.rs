//! Domain events - events emitted when engagement state changes
//!
//! The controller publishes these once a write settles, so listeners (the
//! presentation layer, audit logging) see confirmed changes and rollbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, ReactionKind, UserId};

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    ReactionAdded(ReactionChangedEvent),
    ReactionChanged(ReactionChangedEvent),
    ReactionRemoved(ReactionRemovedEvent),
    ReactionRolledBack(ReactionRolledBackEvent),
    ReactionsReconciled(ReactionsReconciledEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionChanged(_) => "REACTION_CHANGED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
            Self::ReactionRolledBack(_) => "REACTION_ROLLED_BACK",
            Self::ReactionsReconciled(_) => "REACTIONS_RECONCILED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ReactionAdded(e) | Self::ReactionChanged(e) => e.timestamp,
            Self::ReactionRemoved(e) => e.timestamp,
            Self::ReactionRolledBack(e) => e.timestamp,
            Self::ReactionsReconciled(e) => e.timestamp,
        }
    }

    /// Post the event concerns
    pub fn post_id(&self) -> PostId {
        match self {
            Self::ReactionAdded(e) | Self::ReactionChanged(e) => e.post_id,
            Self::ReactionRemoved(e) => e.post_id,
            Self::ReactionRolledBack(e) => e.post_id,
            Self::ReactionsReconciled(e) => e.post_id,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionChangedEvent {
    pub post_id: PostId,
    pub user_id: UserId,
    pub kind: ReactionKind,
    pub glyph: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRemovedEvent {
    pub post_id: PostId,
    pub user_id: UserId,
    pub kind: ReactionKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRolledBackEvent {
    pub post_id: PostId,
    pub user_id: UserId,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionsReconciledEvent {
    pub post_id: PostId,
    pub total: u64,
    pub timestamp: DateTime<Utc>,
}

impl ReactionChangedEvent {
    pub fn new(post_id: PostId, user_id: UserId, kind: ReactionKind, glyph: impl Into<String>) -> Self {
        Self {
            post_id,
            user_id,
            kind,
            glyph: glyph.into(),
            timestamp: Utc::now(),
        }
    }
}

impl ReactionRemovedEvent {
    pub fn new(post_id: PostId, user_id: UserId, kind: ReactionKind) -> Self {
        Self {
            post_id,
            user_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

impl ReactionRolledBackEvent {
    pub fn new(post_id: PostId, user_id: UserId, reason: impl Into<String>) -> Self {
        Self {
            post_id,
            user_id,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}

impl ReactionsReconciledEvent {
    pub fn new(post_id: PostId, total: u64) -> Self {
        Self {
            post_id,
            total,
            timestamp: Utc::now(),
        }
    }
}
