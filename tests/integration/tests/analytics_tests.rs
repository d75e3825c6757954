//! Community analytics through the service layer

use std::sync::Arc;

use dw_core::{
    Comment, CommunityAnalytics, CommunityId, Post, PostId, ReactionKind, ReactionRecord, TopConversation,
};
use dw_service::{AnalyticsService, AnalyticsSource};
use integration_tests::{FixedAnalyticsRpc, TestWorld};

fn react(world: &TestWorld, post: &Post, user: dw_core::UserId) {
    world
        .store
        .seed_reaction(ReactionRecord::new(post.id, user, ReactionKind::Like, ReactionKind::Like.glyph()))
        .unwrap();
}

#[tokio::test]
async fn test_fallback_ranks_top_conversations() {
    let world = TestWorld::new();
    let users: Vec<_> = (0..10).map(|_| world.member()).collect();
    let author = world.post.author_id;

    let busy = Post::new(world.community, author, "Hackathon results", "announcement");
    let lively = Post::new(world.community, author, "Which laptop should we standardise on?", "question");
    let quiet = Post::new(world.community, author, "Parking lot resurfacing", "discussion");
    for post in [&busy, &lively, &quiet] {
        world.store.add_post(post.clone());
    }

    for user in &users {
        react(&world, &busy, *user);
    }
    for user in &users[..5] {
        react(&world, &lively, *user);
    }
    world.store.add_comment(Comment::new(lively.id, users[5]));
    world.store.add_comment(Comment::new(lively.id, users[6]));
    react(&world, &quiet, users[7]);
    world.store.add_comment(Comment::new(quiet.id, users[8]));

    let (report, source) = AnalyticsService::new(&world.ctx)
        .community_analytics_for(world.community, 30)
        .await
        .unwrap();

    assert_eq!(source, AnalyticsSource::Fallback);
    let ranked: Vec<(PostId, u64, u64)> = report
        .top_conversations
        .iter()
        .map(|t| (t.post_id, t.reactions, t.comments))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (busy.id, 10, 0),
            (lively.id, 5, 2),
            (quiet.id, 1, 1),
            (world.post.id, 0, 0),
        ]
    );

    assert_eq!(report.total_posts, 4);
    assert_eq!(report.total_reactions, 16);
    assert_eq!(report.total_comments, 3);
    assert_eq!(report.questions_asked, 1);
    assert_eq!(report.questions_answered, 1);
    assert_eq!(report.total_members, 11);
    assert_eq!(report.engaged_members, 11);
    assert_eq!(report.funnel.reacted, 10);
    assert_eq!(report.funnel.commented, 3);
    assert_eq!(report.funnel.posted, 1);
    assert_eq!(report.posts_by_type.get("announcement"), Some(&2));
}

#[tokio::test]
async fn test_rpc_report_is_reranked_and_capped() {
    let conversations: Vec<TopConversation> = (0..12u64)
        .map(|i| TopConversation {
            post_id: PostId::generate(),
            title: format!("Thread {i}"),
            post_type: "discussion".to_string(),
            reactions: i,
            comments: 0,
        })
        .collect();
    let canned = CommunityAnalytics {
        total_members: 40,
        total_posts: 12,
        top_conversations: conversations,
        ..CommunityAnalytics::default()
    };

    let (world, _) = TestWorld::builder()
        .top_conversations(5)
        .analytics_rpc(Arc::new(FixedAnalyticsRpc::new(canned)))
        .build();

    let (report, source) = AnalyticsService::new(&world.ctx)
        .community_analytics_for(world.community, 7)
        .await
        .unwrap();

    assert_eq!(source, AnalyticsSource::Rpc);
    assert_eq!(report.total_members, 40);
    let scores: Vec<u64> = report.top_conversations.iter().map(TopConversation::score).collect();
    assert_eq!(scores, vec![11, 10, 9, 8, 7]);
}

#[tokio::test]
async fn test_empty_community_reports_zeroes() {
    let world = TestWorld::new();

    let report = AnalyticsService::new(&world.ctx)
        .community_analytics(CommunityId::generate())
        .await
        .unwrap();

    assert_eq!(report, CommunityAnalytics::default());
}
