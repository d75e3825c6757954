//! Reaction engagement controller
//!
//! Owns the optimistic view of one post's reactions for one member. Every
//! intent is applied to the view immediately; the matching store write runs
//! behind the pair's [`WriteSlot`], and a failed write puts the view, the
//! counts and the cached glyph back the way they were.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use dw_core::events::{
    ReactionChangedEvent, ReactionRemovedEvent, ReactionRolledBackEvent, ReactionsReconciledEvent,
};
use dw_core::{
    AggregateCounts, DomainError, DomainEvent, EngagementState, PostId, ReactionIntent,
    ReactionKind, ReactionPhase, ReactionRecord, Transition, UserId, UserSelection, WriteOp,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notifier::Notice;
use super::sequencing::{IntentSequence, WriteSlot};

/// How an intent ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The store accepted the write
    Committed,
    /// Nothing to do
    Unchanged,
    /// A newer intent for the same pair took over
    Superseded,
    /// Rejected before any change
    Rejected(DomainError),
    /// The write failed and the view was restored
    RolledBack(DomainError),
}

impl IntentOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    pub fn error(&self) -> Option<&DomainError> {
        match self {
            Self::Rejected(e) | Self::RolledBack(e) => Some(e),
            _ => None,
        }
    }
}

/// Read-only view of the controller
///
/// Serialize through `ReactionSummaryResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSnapshot {
    pub post_id: PostId,
    pub user_id: UserId,
    pub counts: AggregateCounts,
    pub selection: UserSelection,
    pub phase: ReactionPhase,
}

impl ReactionSnapshot {
    /// Kind shown as active, inferred from a cached glyph if needed
    pub fn active_kind(&self) -> Option<ReactionKind> {
        self.selection.effective_kind()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, ReactionPhase::Pending { .. })
    }
}

#[derive(Debug)]
struct PendingIntent {
    intended: Option<ReactionKind>,
    previous: ReactionPhase,
}

#[derive(Debug, Default)]
struct ControllerState {
    view: EngagementState,
    /// Set once the store has answered a read or accepted a write
    answered: bool,
    pending: Option<PendingIntent>,
}

/// A failed write and the cache entry it displaced
struct WriteFailure {
    error: DomainError,
    prior_glyph: Option<String>,
}

/// Reaction state machine for one `(post, member)` pair
pub struct ReactionController {
    ctx: ServiceContext,
    post_id: PostId,
    user_id: UserId,
    slot: Arc<WriteSlot>,
    sequence: IntentSequence,
    state: Mutex<ControllerState>,
}

impl std::fmt::Debug for ReactionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionController")
            .field("post_id", &self.post_id)
            .field("user_id", &self.user_id)
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl ReactionController {
    pub fn new(ctx: ServiceContext, post_id: PostId, user_id: UserId) -> Self {
        let slot = ctx.write_slots().slot(post_id, user_id);
        Self {
            ctx,
            post_id,
            user_id,
            slot,
            sequence: IntentSequence::default(),
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current view
    pub fn snapshot(&self) -> ReactionSnapshot {
        let state = self.state.lock();
        let phase = match &state.pending {
            Some(pending) => ReactionPhase::Pending {
                intended: pending.intended,
                previous: Box::new(pending.previous.clone()),
            },
            None => state.view.phase(),
        };
        ReactionSnapshot {
            post_id: self.post_id,
            user_id: self.user_id,
            counts: state.view.counts,
            selection: state.view.selection.clone(),
            phase,
        }
    }

    /// Show the glyph cached on this device until the store answers
    ///
    /// Does nothing once the store has answered or an intent is in flight.
    #[instrument(skip(self), fields(post_id = %self.post_id, user_id = %self.user_id))]
    pub async fn restore_cached_glyph(&self) -> Option<String> {
        let cached = match self
            .ctx
            .bounded(self.ctx.glyph_cache().get(self.post_id, self.user_id))
            .await
        {
            Ok(cached) => cached?,
            Err(e) => {
                warn!(error = %e, "Glyph cache read failed");
                return None;
            }
        };

        let mut state = self.state.lock();
        if state.answered || state.pending.is_some() || state.view.selection.is_reacted() {
            return None;
        }
        state.view.selection = UserSelection::from_cached_glyph(cached.clone());
        debug!(glyph = %cached, "Restored cached glyph");
        Some(cached)
    }

    /// Load the post's reactions; the store wins over the local view
    #[instrument(skip(self), fields(post_id = %self.post_id, user_id = %self.user_id))]
    pub async fn load(&self) -> ServiceResult<ReactionSnapshot> {
        let mut stored = self.slot.acquire().await;
        let seq = self.sequence.latest();

        match self.refresh(seq, &mut *stored).await {
            Ok(()) => Ok(self.snapshot()),
            Err(e) => {
                self.ctx.notifier().notice(Notice::from_error(&e));
                Err(e.into())
            }
        }
    }

    /// Pick a reaction kind; picking the active kind removes it
    pub async fn select(&self, kind: ReactionKind) -> IntentOutcome {
        self.submit(ReactionIntent::Select(kind)).await
    }

    /// Pick any emoji; it must resolve to a catalog kind
    pub async fn select_glyph(&self, glyph: &str) -> IntentOutcome {
        self.submit(ReactionIntent::SelectGlyph(glyph.to_string())).await
    }

    /// Take back the active reaction
    pub async fn remove(&self) -> IntentOutcome {
        self.submit(ReactionIntent::Remove).await
    }

    #[instrument(skip(self), fields(post_id = %self.post_id, user_id = %self.user_id))]
    async fn submit(&self, intent: ReactionIntent) -> IntentOutcome {
        let planned = {
            let mut state = self.state.lock();
            state.view.plan(&intent).map(|transition| {
                transition.map(|transition| {
                    let seq = self.sequence.issue();
                    let previous = match state.pending.take() {
                        Some(pending) => pending.previous,
                        None => state.view.phase(),
                    };
                    state.pending = Some(PendingIntent {
                        intended: transition.write.target_kind(),
                        previous,
                    });
                    state.view = transition.after.clone();
                    (seq, transition)
                })
            })
        };

        let (seq, transition) = match planned {
            Ok(Some(planned)) => planned,
            Ok(None) => return IntentOutcome::Unchanged,
            Err(e) => {
                warn!(error = %e, "Reaction intent rejected");
                self.ctx.notifier().notice(Notice::from_error(&e));
                return IntentOutcome::Rejected(e);
            }
        };

        debug!(seq, write = ?transition.write, "Applied optimistic reaction");

        let mut stored = self.slot.acquire().await;
        if !self.sequence.is_latest(seq) {
            debug!(seq, latest = self.sequence.latest(), "Skipping superseded reaction write");
            return IntentOutcome::Superseded;
        }

        let result = self.execute(&transition, (*stored).as_ref()).await;
        match result {
            Ok(()) => self.commit(seq, &transition, &mut stored),
            Err(failure) => self.roll_back(seq, &transition, failure, &mut stored).await,
        }
    }

    /// Check the post, mirror the target into the cache, write the store
    ///
    /// `stored` is the pair's last selection the store confirmed, from any
    /// controller.
    async fn execute(&self, transition: &Transition, stored: Option<&UserSelection>) -> Result<(), WriteFailure> {
        let fallback_glyph = transition.before.selection.glyph.clone();

        match self.ctx.bounded(self.ctx.post_repo().exists(self.post_id)).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(WriteFailure {
                    error: DomainError::PostNotFound(self.post_id),
                    prior_glyph: fallback_glyph,
                })
            }
            Err(error) => {
                return Err(WriteFailure {
                    error,
                    prior_glyph: fallback_glyph,
                })
            }
        }

        let cache = self.ctx.glyph_cache();
        let prior_glyph = match self.ctx.bounded(cache.get(self.post_id, self.user_id)).await {
            Ok(glyph) => glyph,
            Err(e) => {
                warn!(error = %e, "Glyph cache read failed");
                fallback_glyph
            }
        };
        let target_glyph = transition.write.target_glyph();
        if let Err(e) = self
            .ctx
            .bounded(cache.restore(self.post_id, self.user_id, target_glyph))
            .await
        {
            warn!(error = %e, "Glyph cache write failed");
        }

        let write = transition.write.rebase(stored);

        let result = match write {
            None => Ok(()),
            Some(WriteOp::Insert { kind, glyph }) => {
                let record = ReactionRecord::new(self.post_id, self.user_id, kind, glyph);
                self.ctx.bounded(self.ctx.reaction_repo().insert(&record)).await
            }
            Some(WriteOp::Upsert { kind, glyph }) => {
                let record = ReactionRecord::new(self.post_id, self.user_id, kind, glyph);
                self.ctx.bounded(self.ctx.reaction_repo().upsert(&record)).await
            }
            Some(WriteOp::Delete { .. }) => self
                .ctx
                .bounded(self.ctx.reaction_repo().delete(self.post_id, self.user_id))
                .await
                .map(|_| ()),
        };

        result.map_err(|error| WriteFailure { error, prior_glyph })
    }

    fn commit(&self, seq: u64, transition: &Transition, stored: &mut Option<UserSelection>) -> IntentOutcome {
        *stored = Some(transition.after.selection.clone());
        {
            let mut state = self.state.lock();
            state.answered = true;
            if self.sequence.is_latest(seq) {
                state.pending = None;
            }
        }

        let event = match &transition.write {
            WriteOp::Delete { kind } => {
                info!(seq, kind = %kind, "Reaction removed");
                DomainEvent::ReactionRemoved(ReactionRemovedEvent::new(self.post_id, self.user_id, *kind))
            }
            WriteOp::Insert { kind, glyph } | WriteOp::Upsert { kind, glyph } => {
                info!(seq, kind = %kind, glyph = %glyph, "Reaction saved");
                let changed = ReactionChangedEvent::new(self.post_id, self.user_id, *kind, glyph.clone());
                if transition.before.selection.is_reacted() {
                    DomainEvent::ReactionChanged(changed)
                } else {
                    DomainEvent::ReactionAdded(changed)
                }
            }
        };
        self.ctx.notifier().event(&event);

        IntentOutcome::Committed
    }

    async fn roll_back(
        &self,
        seq: u64,
        transition: &Transition,
        failure: WriteFailure,
        stored: &mut Option<UserSelection>,
    ) -> IntentOutcome {
        let WriteFailure { mut error, prior_glyph } = failure;

        if let Err(cache_err) = self
            .ctx
            .bounded(
                self.ctx
                    .glyph_cache()
                    .restore(self.post_id, self.user_id, prior_glyph.as_deref()),
            )
            .await
        {
            warn!(error = %cache_err, "Could not restore cached glyph");
            error = DomainError::RollbackInconsistency(format!("{error}; cache: {cache_err}"));
        }

        let unconfirmed = {
            let mut state = self.state.lock();
            if !self.sequence.is_latest(seq) {
                debug!(seq, error = %error, "Discarding failure of superseded reaction write");
                return IntentOutcome::Superseded;
            }
            state.view = transition.before.clone();
            state.pending = None;
            stored.as_ref() != Some(&transition.before.selection)
        };

        warn!(seq, error = %error, code = error.code(), "Reaction write failed, rolled back");
        self.ctx.notifier().notice(Notice::from_error(&error));
        self.ctx.notifier().event(&DomainEvent::ReactionRolledBack(ReactionRolledBackEvent::new(
            self.post_id,
            self.user_id,
            error.code(),
        )));

        if error.needs_reconcile() || unconfirmed {
            if let Err(e) = self.refresh(seq, stored).await {
                warn!(error = %e, "Reconciliation after rollback failed");
                self.ctx.notifier().notice(Notice::from_error(&e));
            }
        }

        IntentOutcome::RolledBack(error)
    }

    /// Re-read the store into `stored`, the guarded slot state
    ///
    /// The view is replaced only if this controller issued no intent after
    /// `seq`.
    async fn refresh(&self, seq: u64, stored: &mut Option<UserSelection>) -> Result<(), DomainError> {
        let records = self
            .ctx
            .bounded(self.ctx.reaction_repo().list_by_post(self.post_id))
            .await?;
        let fresh = EngagementState::from_records(&records, self.user_id);

        *stored = Some(fresh.selection.clone());
        {
            let mut state = self.state.lock();
            state.answered = true;
            if self.sequence.latest() == seq {
                state.view = fresh.clone();
                state.pending = None;
            }
        }

        if let Err(e) = self
            .ctx
            .bounded(self.ctx.glyph_cache().restore(
                self.post_id,
                self.user_id,
                fresh.selection.glyph.as_deref(),
            ))
            .await
        {
            warn!(error = %e, "Could not refresh cached glyph");
        }

        info!(total = fresh.counts.total(), "Reactions reconciled with store");
        self.ctx.notifier().event(&DomainEvent::ReactionsReconciled(ReactionsReconciledEvent::new(
            self.post_id,
            fresh.counts.total(),
        )));
        Ok(())
    }
}
