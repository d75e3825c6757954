//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CommunityId, PostId};

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Community not found: {0}")]
    CommunityNotFound(CommunityId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Unsupported reaction glyph: {0}")]
    UnsupportedGlyph(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    // =========================================================================
    // Consistency Errors
    // =========================================================================
    #[error("Could not restore previous reaction state: {0}")]
    RollbackInconsistency(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Failed to fetch reactions: {0}")]
    ReactionFetch(String),

    #[error("Request timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Analytics RPC unavailable: {0}")]
    AnalyticsUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for notices and logs
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",

            // Validation
            Self::UnsupportedGlyph(_) => "UNSUPPORTED_GLYPH",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Conflict
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",

            // Consistency
            Self::RollbackInconsistency(_) => "ROLLBACK_INCONSISTENCY",

            // Infrastructure
            Self::ReactionFetch(_) => "FETCH_FAILED",
            Self::Timeout { .. } => "TIMEOUT",
            Self::AnalyticsUnavailable(_) => "ANALYTICS_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::CommunityNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnsupportedGlyph(_) | Self::ValidationError(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReactionAlreadyExists)
    }

    /// Check if local and remote state may have diverged
    ///
    /// Callers re-fetch from the store after these instead of trusting the
    /// optimistic view.
    pub fn needs_reconcile(&self) -> bool {
        matches!(
            self,
            Self::ReactionAlreadyExists | Self::RollbackInconsistency(_) | Self::Timeout { .. }
        )
    }

    /// Check if this came from the transport or backing services
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::ReactionFetch(_)
                | Self::Timeout { .. }
                | Self::AnalyticsUnavailable(_)
                | Self::DatabaseError(_)
                | Self::CacheError(_)
                | Self::InternalError(_)
        )
    }
}
