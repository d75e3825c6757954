//! Property tests over random intent sequences

use std::collections::HashSet;

use proptest::prelude::*;

use dw_core::{glyph_for, kind_for, ReactionKind};
use dw_service::{IntentOutcome, ReactionController};
use integration_tests::TestWorld;

#[derive(Debug, Clone)]
enum Step {
    Select(usize, ReactionKind),
    Picker(usize, ReactionKind),
    Remove(usize),
}

const MEMBERS: usize = 4;

fn kind() -> impl Strategy<Value = ReactionKind> {
    (0..ReactionKind::ALL.len()).prop_map(|i| ReactionKind::ALL[i])
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..MEMBERS, kind()).prop_map(|(m, k)| Step::Select(m, k)),
        1 => (0..MEMBERS, kind()).prop_map(|(m, k)| Step::Picker(m, k)),
        1 => (0..MEMBERS).prop_map(Step::Remove),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn store_and_counts_agree(steps in prop::collection::vec(step(), 1..40)) {
        runtime().block_on(async {
            let world = TestWorld::new();
            let mut controllers: Vec<ReactionController> = Vec::with_capacity(MEMBERS);
            for _ in 0..MEMBERS {
                controllers.push(world.loaded_controller().await);
            }

            for step in &steps {
                let outcome = match step {
                    Step::Select(m, k) => controllers[*m].select(*k).await,
                    Step::Picker(m, k) => controllers[*m].select_glyph(k.glyph()).await,
                    Step::Remove(m) => controllers[*m].remove().await,
                };
                assert!(
                    matches!(outcome, IntentOutcome::Committed | IntentOutcome::Unchanged),
                    "unexpected outcome {outcome:?} for {step:?}"
                );
            }

            let rows = world.store.reactions();
            let pairs: HashSet<_> = rows.iter().map(|r| (r.post_id, r.user_id)).collect();
            assert_eq!(pairs.len(), rows.len(), "one reaction per member and post");

            for controller in &controllers {
                let local = controller.snapshot();
                let stored = rows.iter().find(|r| r.user_id == controller.user_id());
                assert_eq!(local.active_kind(), stored.map(|r| r.kind()));

                let loaded = controller.load().await.unwrap();
                assert_eq!(loaded.counts.total(), rows.len() as u64);
                for kind in ReactionKind::ALL {
                    let expected = rows.iter().filter(|r| r.kind() == kind).count() as u64;
                    assert_eq!(loaded.counts.get(kind), expected);
                }
            }
        });
    }

    #[test]
    fn catalog_glyph_round_trips(k in kind()) {
        prop_assert_eq!(kind_for(glyph_for(k)), Some(k));
    }
}
