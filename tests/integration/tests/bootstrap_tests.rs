//! Startup against real backends
//!
//! Skipped unless DATABASE_URL points at a disposable PostgreSQL database.

use std::path::PathBuf;

use dw_common::AppConfig;
use dw_core::{CommunityAnalytics, CommunityId, PostId, UserId};
use dw_service::bootstrap::{connect, init_telemetry};
use dw_service::{AnalyticsService, ReactionController};
use integration_tests::RecordingNotifier;

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../crates/dw-db/migrations")
}

fn config() -> Option<AppConfig> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping: DATABASE_URL not set");
        return None;
    }
    Some(AppConfig::from_env().expect("config should load"))
}

#[tokio::test]
async fn test_connect_and_report() {
    let Some(config) = config() else { return };
    init_telemetry(&config);

    let notifier = RecordingNotifier::new();
    let ctx = connect(&config, Some(&migrations_dir()), notifier.clone())
        .await
        .expect("connect should succeed");

    let report = AnalyticsService::new(&ctx)
        .community_analytics(CommunityId::generate())
        .await
        .unwrap();
    assert_eq!(report, CommunityAnalytics::default());

    // Unknown post: loading works, writing is refused
    let controller = ReactionController::new(ctx, PostId::generate(), UserId::generate());
    let snapshot = controller.load().await.unwrap();
    assert_eq!(snapshot.counts.total(), 0);
    let outcome = controller.select(dw_core::ReactionKind::Like).await;
    assert_eq!(outcome.error().map(dw_core::DomainError::code), Some("UNKNOWN_POST"));
    assert_eq!(notifier.notice_codes(), vec!["UNKNOWN_POST"]);
}
