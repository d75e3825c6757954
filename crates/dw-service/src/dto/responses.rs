//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.

use serde::Serialize;

use dw_core::{PostId, ReactionKind};

use crate::services::ReactionSnapshot;

/// Generic response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// One non-zero count row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionCountResponse {
    pub kind: ReactionKind,
    pub glyph: &'static str,
    pub label: &'static str,
    pub count: u64,
    /// The current member holds this reaction
    pub me: bool,
}

/// The current member's reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentReactionResponse {
    pub kind: ReactionKind,
    pub glyph: String,
    pub label: &'static str,
}

/// Reaction summary for one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummaryResponse {
    pub post_id: PostId,
    pub total: u64,
    pub counts: Vec<ReactionCountResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentReactionResponse>,
    pub pending: bool,
}

impl From<&ReactionSnapshot> for ReactionSummaryResponse {
    fn from(snapshot: &ReactionSnapshot) -> Self {
        let active = snapshot.active_kind();
        let current = active.map(|kind| CurrentReactionResponse {
            kind,
            glyph: snapshot
                .selection
                .glyph
                .clone()
                .unwrap_or_else(|| kind.glyph().to_string()),
            label: kind.label(),
        });

        Self {
            post_id: snapshot.post_id,
            total: snapshot.counts.total(),
            counts: snapshot
                .counts
                .iter()
                .map(|(kind, count)| ReactionCountResponse {
                    kind,
                    glyph: kind.glyph(),
                    label: kind.label(),
                    count,
                    me: active == Some(kind),
                })
                .collect(),
            current,
            pending: snapshot.is_pending(),
        }
    }
}
