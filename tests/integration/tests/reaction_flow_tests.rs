//! End-to-end reaction flows against the in-memory backends

use dw_core::{ReactionKind, ReactionPhase, ReactionRecord, UserSelection};
use dw_service::{IntentOutcome, ReactionBar, ReactionBarEvent};
use integration_tests::TestWorld;
use std::sync::Arc;

#[tokio::test]
async fn test_like_then_love_then_click_love_clears() {
    let world = TestWorld::new();
    let controller = world.loaded_controller().await;

    assert_eq!(controller.select(ReactionKind::Like).await, IntentOutcome::Committed);
    assert_eq!(controller.select(ReactionKind::Love).await, IntentOutcome::Committed);

    let rows = world.store.reactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind(), ReactionKind::Love);

    // Picking the active kind again takes it back
    assert_eq!(controller.select(ReactionKind::Love).await, IntentOutcome::Committed);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, ReactionPhase::Unreacted);
    assert_eq!(snapshot.counts.total(), 0);
    assert!(world.store.reactions().is_empty());
    assert_eq!(world.cache.peek(world.post.id, controller.user_id()), None);
    assert_eq!(
        world.notifier.event_types(),
        vec!["REACTIONS_RECONCILED", "REACTION_ADDED", "REACTION_CHANGED", "REACTION_REMOVED"]
    );
    assert!(world.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_remove_without_reaction_is_noop() {
    let world = TestWorld::new();
    let controller = world.loaded_controller().await;

    assert_eq!(controller.remove().await, IntentOutcome::Unchanged);
    assert_eq!(controller.remove().await, IntentOutcome::Unchanged);
    assert_eq!(world.reactions.writes(), 0);
    assert_eq!(controller.snapshot().phase, ReactionPhase::Unreacted);
}

#[tokio::test]
async fn test_counts_include_other_members() {
    let world = TestWorld::new();
    for kind in [ReactionKind::Clap, ReactionKind::Clap, ReactionKind::Sad] {
        world
            .store
            .seed_reaction(ReactionRecord::new(world.post.id, world.member(), kind, kind.glyph()))
            .unwrap();
    }

    let controller = world.loaded_controller().await;
    controller.select(ReactionKind::Clap).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.counts.get(ReactionKind::Clap), 3);
    assert_eq!(snapshot.counts.get(ReactionKind::Sad), 1);
    assert_eq!(snapshot.counts.total(), 4);

    let other = world.loaded_controller().await;
    assert_eq!(other.snapshot().counts, snapshot.counts);
    assert_eq!(other.snapshot().selection, UserSelection::none());
}

#[tokio::test]
async fn test_picker_glyph_with_skin_tone_resolves() {
    let world = TestWorld::new();
    let controller = world.loaded_controller().await;

    let outcome = controller.select_glyph("\u{1F44D}\u{1F3FD}").await;
    assert!(outcome.is_committed());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.active_kind(), Some(ReactionKind::Like));
    let rows = world.store.reactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind(), ReactionKind::Like);
}

#[tokio::test]
async fn test_unsupported_glyph_rejected_without_write() {
    let world = TestWorld::new();
    let controller = world.loaded_controller().await;
    controller.select(ReactionKind::Wow).await;
    let before = controller.snapshot();

    let outcome = controller.select_glyph("\u{1F355}").await;
    assert!(matches!(outcome, IntentOutcome::Rejected(ref e) if e.code() == "UNSUPPORTED_GLYPH"));
    assert_eq!(controller.snapshot(), before);
    assert_eq!(world.reactions.writes(), 1);
    assert_eq!(world.notifier.notice_codes(), vec!["UNSUPPORTED_GLYPH"]);
}

#[tokio::test]
async fn test_cached_glyph_shown_until_load() {
    let world = TestWorld::new();
    let user = world.member();
    world
        .store
        .seed_reaction(ReactionRecord::new(world.post.id, user, ReactionKind::Helpful, ReactionKind::Helpful.glyph()))
        .unwrap();

    // An earlier session on this device left the glyph behind
    let first = world.controller(user);
    first.load().await.unwrap();
    assert_eq!(world.cache.peek(world.post.id, user).as_deref(), Some(ReactionKind::Helpful.glyph()));

    let second = world.controller(user);
    let restored = second.restore_cached_glyph().await;
    assert_eq!(restored.as_deref(), Some(ReactionKind::Helpful.glyph()));
    assert_eq!(second.snapshot().active_kind(), Some(ReactionKind::Helpful));
    assert_eq!(second.snapshot().counts.total(), 0);

    let loaded = second.load().await.unwrap();
    assert_eq!(loaded.selection, UserSelection::reacted(ReactionKind::Helpful, ReactionKind::Helpful.glyph()));
    assert_eq!(loaded.counts.total(), 1);
}

#[tokio::test]
async fn test_reaction_bar_drives_controller() {
    let world = TestWorld::new();
    let controller = Arc::new(world.loaded_controller().await);
    let mut bar = ReactionBar::new(controller.clone());

    let outcome = bar.dispatch(ReactionBarEvent::ButtonClicked).await;
    assert_eq!(outcome, Some(IntentOutcome::Committed));
    assert_eq!(controller.snapshot().active_kind(), Some(ReactionKind::Like));

    let outcome = bar.dispatch(ReactionBarEvent::ButtonClicked).await;
    assert_eq!(outcome, Some(IntentOutcome::Committed));
    assert_eq!(controller.snapshot().phase, ReactionPhase::Unreacted);
    assert!(world.store.reactions().is_empty());
}
