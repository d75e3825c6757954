//! Rapid repeated intents on one (post, member) pair

use std::sync::Arc;

use dw_core::{DomainError, ReactionKind, ReactionPhase};
use dw_service::IntentOutcome;
use integration_tests::{wait_until, TestWorld};

#[tokio::test]
async fn test_rapid_picks_skip_superseded_writes() {
    let (world, gate) = TestWorld::builder().gated().build();
    let gate = gate.unwrap();
    let controller = Arc::new(world.loaded_controller().await);

    let first = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Like).await }
    });
    wait_until(|| world.reactions.waiting() == 1).await;

    let second = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Love).await }
    });
    wait_until(|| controller.snapshot().active_kind() == Some(ReactionKind::Love)).await;

    let third = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Clap).await }
    });
    wait_until(|| controller.snapshot().active_kind() == Some(ReactionKind::Clap)).await;

    let pending = controller.snapshot();
    assert!(pending.is_pending());
    assert_eq!(
        pending.phase,
        ReactionPhase::Pending {
            intended: Some(ReactionKind::Clap),
            previous: Box::new(ReactionPhase::Unreacted),
        }
    );

    gate.add_permits(2);
    assert_eq!(first.await.unwrap(), IntentOutcome::Committed);
    assert_eq!(second.await.unwrap(), IntentOutcome::Superseded);
    assert_eq!(third.await.unwrap(), IntentOutcome::Committed);

    assert_eq!(world.reactions.writes(), 2);
    let rows = world.store.reactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind(), ReactionKind::Clap);

    let snapshot = controller.snapshot();
    assert!(!snapshot.is_pending());
    assert_eq!(snapshot.active_kind(), Some(ReactionKind::Clap));
    assert_eq!(snapshot.counts.get(ReactionKind::Clap), 1);
    assert_eq!(snapshot.counts.total(), 1);
    assert_eq!(
        world.cache.peek(world.post.id, controller.user_id()).as_deref(),
        Some(ReactionKind::Clap.glyph())
    );
}

#[tokio::test]
async fn test_double_click_ends_unreacted() {
    let (world, gate) = TestWorld::builder().gated().build();
    let gate = gate.unwrap();
    let controller = Arc::new(world.loaded_controller().await);

    let add = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Like).await }
    });
    wait_until(|| world.reactions.waiting() == 1).await;

    let take_back = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Like).await }
    });
    wait_until(|| controller.snapshot().active_kind().is_none()).await;

    gate.add_permits(2);
    assert!(add.await.unwrap().is_committed());
    assert!(take_back.await.unwrap().is_committed());

    assert!(world.store.reactions().is_empty());
    assert_eq!(controller.snapshot().phase, ReactionPhase::Unreacted);
    assert_eq!(world.cache.peek(world.post.id, controller.user_id()), None);
}

#[tokio::test]
async fn test_superseded_failure_is_discarded() {
    let (world, gate) = TestWorld::builder().gated().build();
    let gate = gate.unwrap();
    let controller = Arc::new(world.loaded_controller().await);

    world
        .reactions
        .fail_next_write(DomainError::DatabaseError("connection reset".to_string()));
    let failing = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Like).await }
    });
    wait_until(|| world.reactions.waiting() == 1).await;

    let winning = tokio::spawn({
        let c = controller.clone();
        async move { c.select(ReactionKind::Love).await }
    });
    wait_until(|| controller.snapshot().active_kind() == Some(ReactionKind::Love)).await;

    gate.add_permits(2);
    assert_eq!(failing.await.unwrap(), IntentOutcome::Superseded);
    assert_eq!(winning.await.unwrap(), IntentOutcome::Committed);

    assert_eq!(world.store.reactions()[0].kind(), ReactionKind::Love);
    assert_eq!(controller.snapshot().active_kind(), Some(ReactionKind::Love));
    assert!(world.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_members_write_independently() {
    let world = TestWorld::new();
    let alice = world.loaded_controller().await;
    let bob = world.loaded_controller().await;

    let (a, b) = futures::join!(alice.select(ReactionKind::Like), bob.select(ReactionKind::Like));
    assert!(a.is_committed());
    assert!(b.is_committed());

    let reloaded = alice.load().await.unwrap();
    assert_eq!(reloaded.counts.get(ReactionKind::Like), 2);
    assert_eq!(world.store.reactions().len(), 2);
}

#[tokio::test]
async fn test_two_views_of_one_pair_both_land() {
    let (world, gate) = TestWorld::builder().gated().build();
    let gate = gate.unwrap();
    let user = world.member();

    // Feed card and detail view for the same member and post
    let card = Arc::new(world.controller(user));
    let detail = Arc::new(world.controller(user));
    card.load().await.unwrap();
    detail.load().await.unwrap();

    let first = tokio::spawn({
        let c = card.clone();
        async move { c.select(ReactionKind::Wow).await }
    });
    wait_until(|| world.reactions.waiting() == 1).await;

    let second = tokio::spawn({
        let c = card.clone();
        async move { c.select(ReactionKind::Sad).await }
    });
    wait_until(|| card.snapshot().active_kind() == Some(ReactionKind::Sad)).await;

    let other = tokio::spawn({
        let c = detail.clone();
        async move { c.select(ReactionKind::Love).await }
    });
    wait_until(|| detail.snapshot().active_kind() == Some(ReactionKind::Love)).await;

    gate.add_permits(3);
    assert_eq!(first.await.unwrap(), IntentOutcome::Committed);
    assert_eq!(second.await.unwrap(), IntentOutcome::Committed);
    assert_eq!(other.await.unwrap(), IntentOutcome::Committed);

    assert_eq!(world.reactions.writes(), 3);
    let rows = world.store.reactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind(), ReactionKind::Love);

    assert!(!card.snapshot().is_pending());
    assert!(!detail.snapshot().is_pending());
    assert_eq!(detail.snapshot().active_kind(), Some(ReactionKind::Love));
    assert!(world.notifier.notices().is_empty());

    let reloaded = card.load().await.unwrap();
    assert_eq!(reloaded.active_kind(), Some(ReactionKind::Love));
    assert_eq!(reloaded.counts.total(), 1);
}

#[tokio::test]
async fn test_second_view_writes_against_store_state() {
    let world = TestWorld::new();
    let user = world.member();
    let card = world.controller(user);
    let detail = world.controller(user);
    card.load().await.unwrap();
    detail.load().await.unwrap();

    assert!(card.select(ReactionKind::Like).await.is_committed());

    // The detail view still shows no reaction but the store has one
    assert!(detail.select(ReactionKind::Love).await.is_committed());

    let rows = world.store.reactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind(), ReactionKind::Love);
    assert!(world.notifier.notices().is_empty());
}
