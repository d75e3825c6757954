//! Reaction entity <-> model mapper

use dw_core::entities::ReactionRecord;
use dw_core::error::DomainError;
use dw_core::value_objects::{PostId, ReactionId, StoredReactionType, UserId};
use uuid::Uuid;

use crate::models::ReactionModel;

/// Convert ReactionModel to ReactionRecord entity
///
/// Fails if the `reaction_type` column holds a value outside the three the
/// table admits.
impl TryFrom<ReactionModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let reaction_type: StoredReactionType = model
            .reaction_type
            .parse()
            .map_err(|e| DomainError::DatabaseError(format!("reaction {}: {e}", model.id)))?;

        Ok(ReactionRecord {
            id: ReactionId::new(model.id),
            post_id: PostId::new(model.post_id),
            user_id: UserId::new(model.user_id),
            reaction_type,
            glyph: model.emoji,
            created_at: model.created_at,
        })
    }
}

/// Convert ReactionRecord entity reference to values for database insertion
pub struct ReactionInsert<'a> {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: &'static str,
    pub emoji: &'a str,
}

impl<'a> ReactionInsert<'a> {
    pub fn new(record: &'a ReactionRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            post_id: record.post_id.into_inner(),
            user_id: record.user_id.into_inner(),
            reaction_type: record.reaction_type.as_str(),
            emoji: &record.glyph,
        }
    }
}

/// Convert a batch of rows, failing on the first malformed one
pub fn records_from_models(models: Vec<ReactionModel>) -> Result<Vec<ReactionRecord>, DomainError> {
    models.into_iter().map(ReactionRecord::try_from).collect()
}
