//! Per-(post, member) write ordering
//!
//! Each pair gets one [`WriteSlot`], an async mutex serializing store writes
//! across every controller bound to the pair. The mutex guards the pair's
//! last selection confirmed by the store, so a write is always planned
//! against what the store holds rather than one controller's view. Each
//! controller numbers its own
//! intents with an [`IntentSequence`]; an intent that is no longer that
//! controller's latest when it reaches the mutex skips its write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};

use dw_core::{PostId, UserId, UserSelection};

/// Key of a write slot
pub type SlotKey = (PostId, UserId);

/// Intent counter owned by one controller
#[derive(Debug, Default)]
pub struct IntentSequence {
    latest: AtomicU64,
}

impl IntentSequence {
    /// Issue the next sequence number
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Most recently issued sequence number, 0 before the first intent
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest() == seq
    }
}

/// Write lock for one pair, guarding its last confirmed selection
///
/// The guarded value is `None` until the store has answered for the pair.
#[derive(Debug, Default)]
pub struct WriteSlot {
    lock: Mutex<Option<UserSelection>>,
}

impl WriteSlot {
    /// Wait for exclusive write access
    pub async fn acquire(&self) -> MutexGuard<'_, Option<UserSelection>> {
        self.lock.lock().await
    }
}

/// Registry of write slots shared by every controller
#[derive(Debug, Default)]
pub struct WriteSlots {
    slots: DashMap<SlotKey, Arc<WriteSlot>>,
}

impl WriteSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for the pair, created on first use
    pub fn slot(&self, post_id: PostId, user_id: UserId) -> Arc<WriteSlot> {
        self.slots.entry((post_id, user_id)).or_default().value().clone()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop slots nobody else holds
    pub fn prune(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        before - self.slots.len()
    }
}
