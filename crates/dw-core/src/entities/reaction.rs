//! Reaction entities - persisted reaction rows and their aggregate view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, ReactionId, ReactionKind, StoredReactionType, UserId};

/// One member's reaction to one post
///
/// The store keeps at most one record per `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub id: ReactionId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub reaction_type: StoredReactionType,
    pub glyph: String,
    pub created_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Create a new record for `kind`, displayed with `glyph`
    pub fn new(post_id: PostId, user_id: UserId, kind: ReactionKind, glyph: impl Into<String>) -> Self {
        Self {
            id: ReactionId::generate(),
            post_id,
            user_id,
            reaction_type: kind.stored_type(),
            glyph: glyph.into(),
            created_at: Utc::now(),
        }
    }

    /// Semantic kind of this row
    ///
    /// The glyph wins over the stored column; the column only narrows the
    /// kind when the glyph is not in the catalog.
    pub fn kind(&self) -> ReactionKind {
        ReactionKind::from_glyph(&self.glyph).unwrap_or_else(|| self.reaction_type.default_kind())
    }

    /// Check if this row belongs to `user_id`
    #[inline]
    pub fn is_from(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Per-kind reaction tallies for a single post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateCounts([u64; ReactionKind::ALL.len()]);

impl AggregateCounts {
    /// Fold a post's reaction rows into counts
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ReactionRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.increment(record.kind());
        }
        counts
    }

    /// Count for a kind
    #[inline]
    pub fn get(&self, kind: ReactionKind) -> u64 {
        self.0[kind.index()]
    }

    pub fn increment(&mut self, kind: ReactionKind) {
        self.0[kind.index()] += 1;
    }

    /// Decrement, saturating at zero. Returns false if the count was already zero.
    pub fn decrement(&mut self, kind: ReactionKind) -> bool {
        let slot = &mut self.0[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Total reactions across all kinds
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Non-zero counts in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u64)> + '_ {
        ReactionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, count)| *count > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The current member's reaction as seen by the UI
///
/// `glyph` may be set without `kind` when the selection was restored from the
/// local glyph cache before the remote rows were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSelection {
    pub kind: Option<ReactionKind>,
    pub glyph: Option<String>,
}

impl UserSelection {
    /// No active reaction
    pub fn none() -> Self {
        Self::default()
    }

    /// Active reaction of `kind` shown with `glyph`
    pub fn reacted(kind: ReactionKind, glyph: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            glyph: Some(glyph.into()),
        }
    }

    /// Selection holding only a cached glyph hint
    pub fn from_cached_glyph(glyph: impl Into<String>) -> Self {
        Self {
            kind: None,
            glyph: Some(glyph.into()),
        }
    }

    /// Kind to act on: the explicit kind, or the one inferred from the glyph
    pub fn effective_kind(&self) -> Option<ReactionKind> {
        self.kind
            .or_else(|| self.glyph.as_deref().and_then(ReactionKind::from_glyph))
    }

    pub fn is_reacted(&self) -> bool {
        self.effective_kind().is_some()
    }
}

impl From<&ReactionRecord> for UserSelection {
    fn from(record: &ReactionRecord) -> Self {
        Self::reacted(record.kind(), record.glyph.clone())
    }
}
