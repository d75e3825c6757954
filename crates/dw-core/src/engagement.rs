//! Reaction engagement state machine
//!
//! Pure transition planning for one `(post, user)` pair. The controller in
//! `dw-service` applies a planned [`Transition`] optimistically, performs its
//! [`WriteOp`] against the store, and reverts to [`Transition::before`] if the
//! write fails. Nothing here performs I/O.

use serde::{Deserialize, Serialize};

use crate::entities::{AggregateCounts, ReactionRecord, UserSelection};
use crate::error::DomainError;
use crate::value_objects::{ReactionKind, UserId};

/// Counts and the member's selection for one post
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngagementState {
    pub counts: AggregateCounts,
    pub selection: UserSelection,
}

/// Observable phase of a `(post, user)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ReactionPhase {
    Unreacted,
    Reacted {
        kind: ReactionKind,
        glyph: String,
    },
    /// A write is in flight; `intended` is `None` for a removal
    Pending {
        intended: Option<ReactionKind>,
        previous: Box<ReactionPhase>,
    },
}

/// What the member asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionIntent {
    /// Pick a kind from the quick-pick row; picking the active kind removes it
    Select(ReactionKind),
    /// Pick any emoji from the full picker
    SelectGlyph(String),
    /// Click the active reaction to take it back
    Remove,
}

/// Store write that makes a transition durable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// First reaction on the post
    Insert { kind: ReactionKind, glyph: String },
    /// Replace whatever reaction the member had
    Upsert { kind: ReactionKind, glyph: String },
    /// Remove the member's reaction
    Delete { kind: ReactionKind },
}

impl WriteOp {
    /// Kind the member ends up with, `None` for a delete
    pub fn target_kind(&self) -> Option<ReactionKind> {
        match self {
            Self::Insert { kind, .. } | Self::Upsert { kind, .. } => Some(*kind),
            Self::Delete { .. } => None,
        }
    }

    /// Glyph the local cache should hold once the write lands
    pub fn target_glyph(&self) -> Option<&str> {
        match self {
            Self::Insert { glyph, .. } | Self::Upsert { glyph, .. } => Some(glyph),
            Self::Delete { .. } => None,
        }
    }

    /// Recompute the write against what the store last confirmed
    ///
    /// `confirmed` is `None` when the store has never answered for this pair;
    /// an upsert is used then since a row may already exist. Returns `None`
    /// when the store already holds the target.
    pub fn rebase(&self, confirmed: Option<&UserSelection>) -> Option<WriteOp> {
        let (kind, glyph) = match self {
            Self::Delete { .. } => return Some(self.clone()),
            Self::Insert { kind, glyph } | Self::Upsert { kind, glyph } => (*kind, glyph),
        };

        let Some(confirmed) = confirmed else {
            return Some(Self::Upsert { kind, glyph: glyph.clone() });
        };

        match confirmed.effective_kind() {
            None => Some(Self::Insert { kind, glyph: glyph.clone() }),
            Some(current) if current == kind && confirmed.glyph.as_deref() == Some(glyph.as_str()) => None,
            Some(_) => Some(Self::Upsert { kind, glyph: glyph.clone() }),
        }
    }
}

/// A planned optimistic change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub before: EngagementState,
    pub after: EngagementState,
    pub write: WriteOp,
}

impl EngagementState {
    /// Rebuild from the store's rows for a post
    pub fn from_records(records: &[ReactionRecord], user_id: UserId) -> Self {
        Self {
            counts: AggregateCounts::from_records(records),
            selection: records
                .iter()
                .find(|r| r.is_from(user_id))
                .map(UserSelection::from)
                .unwrap_or_default(),
        }
    }

    /// Current phase, ignoring in-flight writes
    pub fn phase(&self) -> ReactionPhase {
        match (self.selection.effective_kind(), &self.selection.glyph) {
            (Some(kind), Some(glyph)) => ReactionPhase::Reacted {
                kind,
                glyph: glyph.clone(),
            },
            (Some(kind), None) => ReactionPhase::Reacted {
                kind,
                glyph: kind.glyph().to_string(),
            },
            (None, _) => ReactionPhase::Unreacted,
        }
    }

    /// Plan the transition for `intent`
    ///
    /// Returns `Ok(None)` when the intent changes nothing (removing with no
    /// active reaction). An emoji outside the catalog is rejected with
    /// `DomainError::UnsupportedGlyph` and plans no transition.
    pub fn plan(&self, intent: &ReactionIntent) -> Result<Option<Transition>, DomainError> {
        let current = self.selection.effective_kind();

        let target = match intent {
            ReactionIntent::Remove => None,
            ReactionIntent::Select(kind) => {
                if current == Some(*kind) {
                    None
                } else {
                    Some((*kind, kind.glyph().to_string()))
                }
            }
            ReactionIntent::SelectGlyph(glyph) => {
                let kind = ReactionKind::from_glyph(glyph)
                    .ok_or_else(|| DomainError::UnsupportedGlyph(glyph.clone()))?;
                if current == Some(kind) && self.selection.glyph.as_deref() == Some(glyph.as_str()) {
                    None
                } else {
                    Some((kind, glyph.clone()))
                }
            }
        };

        let mut after = self.clone();
        let write = match (current, target) {
            (None, None) => return Ok(None),
            (Some(old), None) => {
                after.counts.decrement(old);
                after.selection = UserSelection::none();
                WriteOp::Delete { kind: old }
            }
            (None, Some((kind, glyph))) => {
                after.counts.increment(kind);
                after.selection = UserSelection::reacted(kind, glyph.clone());
                WriteOp::Insert { kind, glyph }
            }
            (Some(old), Some((kind, glyph))) => {
                after.counts.decrement(old);
                after.counts.increment(kind);
                after.selection = UserSelection::reacted(kind, glyph.clone());
                WriteOp::Upsert { kind, glyph }
            }
        };

        Ok(Some(Transition {
            before: self.clone(),
            after,
            write,
        }))
    }
}
