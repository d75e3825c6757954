//! Test doubles for the dw-core ports
//!
//! Each fake wraps the in-memory implementation and can be told to fail,
//! stall, or hold a write until the test releases it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use dw_cache::MemoryGlyphCache;
use dw_core::traits::{AnalyticsRpc, GlyphCache, ReactionRepository, RepoResult};
use dw_core::{CommunityAnalytics, CommunityId, DomainError, DomainEvent, PostId, ReactionRecord, UserId};
use dw_db::MemoryStore;
use dw_service::{Notice, Notifier};

// ============================================================================
// Notifier
// ============================================================================

/// Keeps every notice and event for later assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn notice_codes(&self) -> Vec<&'static str> {
        self.notices.lock().iter().map(|n| n.code).collect()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(DomainEvent::event_type).collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
        self.events.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    fn event(&self, event: &DomainEvent) {
        self.events.lock().push(event.clone());
    }
}

// ============================================================================
// Reaction store
// ============================================================================

/// Reaction store that fails, stalls, or holds writes on demand
#[derive(Debug)]
pub struct FlakyReactionRepository {
    inner: MemoryStore,
    next_write_error: Mutex<Option<DomainError>>,
    fail_fetch: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    gate: Option<Arc<Semaphore>>,
    waiting: AtomicUsize,
    writes: AtomicUsize,
}

impl FlakyReactionRepository {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            next_write_error: Mutex::new(None),
            fail_fetch: AtomicBool::new(false),
            write_delay: Mutex::new(None),
            gate: None,
            waiting: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Every write waits for a permit on the returned semaphore
    pub fn gated(inner: MemoryStore) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let repo = Self {
            gate: Some(gate.clone()),
            ..Self::new(inner)
        };
        (repo, gate)
    }

    /// Fail the next write with `error`
    pub fn fail_next_write(&self, error: DomainError) {
        *self.next_write_error.lock() = Some(error);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Sleep before every write
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }

    /// Writes currently held by the gate
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Writes that reached the store
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn before_write(&self) -> RepoResult<()> {
        if let Some(gate) = &self.gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let permit = gate.acquire().await;
            self.waiting.fetch_sub(1, Ordering::SeqCst);
            permit
                .map_err(|e| DomainError::InternalError(e.to_string()))?
                .forget();
        }

        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_write_error.lock().take() {
            return Err(error);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for FlakyReactionRepository {
    async fn list_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionRecord>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(DomainError::ReactionFetch("connection reset".to_string()));
        }
        self.inner.list_by_post(post_id).await
    }

    async fn find(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<ReactionRecord>> {
        self.inner.find(post_id, user_id).await
    }

    async fn insert(&self, record: &ReactionRecord) -> RepoResult<()> {
        self.before_write().await?;
        self.inner.insert(record).await
    }

    async fn upsert(&self, record: &ReactionRecord) -> RepoResult<()> {
        self.before_write().await?;
        self.inner.upsert(record).await
    }

    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool> {
        self.before_write().await?;
        self.inner.delete(post_id, user_id).await
    }
}

// ============================================================================
// Glyph cache
// ============================================================================

/// Glyph cache whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyGlyphCache {
    inner: MemoryGlyphCache,
    fail_writes: AtomicBool,
}

impl FlakyGlyphCache {
    pub fn new(inner: MemoryGlyphCache) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::CacheError("storage quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GlyphCache for FlakyGlyphCache {
    async fn get(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<String>> {
        self.inner.get(post_id, user_id).await
    }

    async fn set(&self, post_id: PostId, user_id: UserId, glyph: &str) -> RepoResult<()> {
        self.check()?;
        self.inner.set(post_id, user_id, glyph).await
    }

    async fn clear(&self, post_id: PostId, user_id: UserId) -> RepoResult<()> {
        self.check()?;
        self.inner.clear(post_id, user_id).await
    }
}

// ============================================================================
// Analytics RPC
// ============================================================================

/// Analytics endpoint returning a canned report
#[derive(Debug, Clone)]
pub struct FixedAnalyticsRpc {
    report: CommunityAnalytics,
}

impl FixedAnalyticsRpc {
    pub fn new(report: CommunityAnalytics) -> Self {
        Self { report }
    }
}

#[async_trait]
impl AnalyticsRpc for FixedAnalyticsRpc {
    async fn community_analytics(
        &self,
        _community_id: CommunityId,
        _days_back: u32,
    ) -> RepoResult<CommunityAnalytics> {
        Ok(self.report.clone())
    }
}

// ============================================================================
// Waiting
// ============================================================================

/// Yield to other tasks until `condition` holds
///
/// # Panics
/// Panics if the condition does not hold within one second.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    let waited = tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(waited.is_ok(), "condition not reached in time");
}
