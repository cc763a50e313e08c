//! Tests for the publishing workflow.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use firekyt_core::connection_form::BLOG_URL_REQUIRED;
use firekyt_core::model::{
    ConnectionTestResult, ConnectionValidation, ContentItem, Platform, PublicationStatus,
    PublishSettings, ValidationReport,
};
use firekyt_core::remote_error::{NETWORK_TITLE, PERMISSION_TITLE, RemoteError};
use firekyt_core::schedule::FixedClock;
use firekyt_core::{
    ConnectionDraft, ConnectionState, Field, NoticeDuration, ScheduleDraft, ScheduleError,
};

use super::{PUBLISH_INVALIDATES, PublishingService};
use crate::cache::{QueryCache, QueryKey};
use crate::error::{CONNECTION_INACTIVE_TITLE, NETWORK_REQUIRED_TITLE, PublishError};
use crate::network::NetworkStatus;
use crate::testing::{Call, FakeApi, at, connection, scheduled};

const NOW: &str = "2026-10-19T12:00:00Z";

fn setup(api: FakeApi) -> (Arc<FakeApi>, Arc<FixedClock>, PublishingService) {
    let api = Arc::new(api);
    let clock = Arc::new(FixedClock::new(at(NOW)));
    let service = PublishingService::new(api.clone(), QueryCache::new(), NetworkStatus::online())
        .with_clock(clock.clone());
    (api, clock, service)
}

fn draft(platform: &str, token: &str, blog_url: &str) -> ConnectionDraft {
    ConnectionDraft {
        platform: platform.into(),
        access_token: token.into(),
        blog_url: Some(blog_url.into()),
        ..Default::default()
    }
}

/// Load every list so invalidation can be observed.
async fn warm(service: &PublishingService) {
    service.connections().await.unwrap();
    service.scheduled().await.unwrap();
    service.history().await.unwrap();
    service.content().await.unwrap();
}

// =============================================================================
// Connection form and lifecycle
// =============================================================================

#[tokio::test]
async fn self_hosted_platform_without_blog_url_sends_nothing() {
    for platform in ["wordpress", "ghost", "custom"] {
        let (api, _, service) = setup(FakeApi::new());
        let err = service
            .create_connection(&draft(platform, "tok", ""))
            .await
            .unwrap_err();
        let PublishError::Form(errors) = err else {
            panic!("expected form error for {platform}, got {err:?}");
        };
        assert_eq!(errors.get(Field::BlogUrl), Some(BLOG_URL_REQUIRED));
        assert!(api.calls().is_empty());
    }
}

#[tokio::test]
async fn hosted_platform_without_blog_url_is_submitted() {
    let (api, _, service) = setup(FakeApi::new());
    let outcome = service
        .create_connection(&draft("medium", "tok", ""))
        .await
        .unwrap();
    assert_eq!(outcome.state, ConnectionState::Active);
    assert_eq!(outcome.connection.blog_url, None);
    assert_eq!(api.calls(), vec![Call::CreateConnection(Platform::Medium)]);
}

#[tokio::test]
async fn wordpress_connection_end_to_end_with_rejected_credentials() {
    let (api, _, service) = setup(
        FakeApi::new().rejecting_credentials("Invalid username or application password"),
    );
    service.connections().await.unwrap();

    let err = service
        .create_connection(&draft("wordpress", "app-password", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Form(ref e) if e.get(Field::BlogUrl).is_some()));
    assert_eq!(api.calls(), vec![Call::ListConnections]);

    let outcome = service
        .create_connection(&draft("wordpress", "app-password", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(
        outcome.state,
        ConnectionState::InactiveWithError {
            error: "Invalid username or application password".into()
        }
    );
    assert_eq!(
        outcome.connection.blog_url.as_deref(),
        Some("https://example.com")
    );
    assert!(service.cache().is_stale(QueryKey::Connections).await);

    // The next read refetches and sees the stored connection.
    let listed = service.connections().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_active);
}

#[tokio::test]
async fn editing_an_inactive_connection_resubmits_it() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::WordPress, false)]));

    let outcome = service
        .update_connection(1, &draft("wordpress", "new-token", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(outcome.state, ConnectionState::Active);
    assert_eq!(
        api.calls(),
        vec![Call::ListConnections, Call::UpdateConnection(1)]
    );
}

#[tokio::test]
async fn editing_unknown_connection_is_not_found() {
    let (api, _, service) = setup(FakeApi::new());
    let err = service
        .update_connection(9, &draft("medium", "tok", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::ConnectionNotFound(9)));
    assert!(!api.calls().contains(&Call::UpdateConnection(9)));
}

#[tokio::test]
async fn remove_invalidates_connections() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::Ghost, true)]));
    warm(&service).await;

    let state = service.remove_connection(1).await.unwrap();
    assert_eq!(state, ConnectionState::Removed);
    assert!(service.cache().is_stale(QueryKey::Connections).await);
    assert!(!service.cache().is_stale(QueryKey::History).await);

    assert!(service.connections().await.unwrap().is_empty());
    assert!(api.calls().contains(&Call::DeleteConnection(1)));
}

#[tokio::test]
async fn validate_all_marks_revoked_connection_inactive() {
    let report = ValidationReport {
        results: vec![
            ConnectionValidation {
                connection_id: 1,
                platform: Some(Platform::WordPress),
                is_valid: true,
                error: None,
            },
            ConnectionValidation {
                connection_id: 2,
                platform: Some(Platform::Medium),
                is_valid: false,
                error: Some("Token revoked".into()),
            },
        ],
    };
    let (_, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![
                connection(1, Platform::WordPress, true),
                connection(2, Platform::Medium, true),
            ])
            .with_validation(report),
    );
    service.connections().await.unwrap();

    let (report, checks) = service.validate_all().await.unwrap();
    assert_eq!(report.invalid().count(), 1);
    assert_eq!(checks[0].state, ConnectionState::Active);
    assert!(!checks[0].deactivated());
    assert!(checks[1].deactivated());
    assert_eq!(checks[1].state.error(), Some("Token revoked"));
    assert!(service.cache().is_stale(QueryKey::Connections).await);
}

#[tokio::test]
async fn test_connection_recovers_inactive_connection() {
    let (api, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(3, Platform::WordPress, false)])
            .with_test_result(ConnectionTestResult {
                success: true,
                message: Some("Connected".into()),
                validation_error: None,
            }),
    );
    service.connections().await.unwrap();

    let check = service.test_connection(3).await.unwrap();
    assert!(matches!(
        check.previous,
        Some(ConnectionState::InactiveWithError { .. })
    ));
    assert_eq!(check.state, ConnectionState::Active);
    assert_eq!(api.calls().last(), Some(&Call::TestConnection(3)));
}

#[tokio::test]
async fn failed_test_without_detail_uses_fallback_message() {
    let (_, _, service) = setup(FakeApi::new().with_test_result(ConnectionTestResult {
        success: false,
        message: None,
        validation_error: Some("  ".into()),
    }));
    let check = service.test_connection(4).await.unwrap();
    assert_eq!(check.previous, None);
    assert_eq!(check.state.error(), Some("Connection is inactive"));
}

// =============================================================================
// Publish now
// =============================================================================

#[tokio::test]
async fn publish_now_offline_sends_nothing() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::WordPress, true)]));
    service.network().set_online(false);

    let err = service.publish_now(10, 1, None).await.unwrap_err();
    assert!(matches!(err, PublishError::Offline));
    assert!(err.is_local());
    assert_eq!(err.notice().title, NETWORK_REQUIRED_TITLE);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn publish_now_to_inactive_connection_sends_nothing() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::WordPress, false)]));
    service.connections().await.unwrap();
    api.clear_calls();

    let err = service.publish_now(10, 1, None).await.unwrap_err();
    match &err {
        PublishError::ConnectionInactive { id, error } => {
            assert_eq!(*id, 1);
            assert_eq!(error.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("expected inactive error, got {other:?}"),
    }
    assert_eq!(err.notice().title, CONNECTION_INACTIVE_TITLE);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn publish_now_trusts_stale_snapshot_of_inactive_connection() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::WordPress, false)]));
    service.connections().await.unwrap();
    service.cache().invalidate(QueryKey::Connections).await;
    api.clear_calls();

    let err = service.publish_now(10, 1, None).await.unwrap_err();
    assert!(matches!(err, PublishError::ConnectionInactive { id: 1, .. }));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn publish_now_after_validate_all_sends_nothing_to_revoked_connection() {
    let (api, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(1, Platform::WordPress, true)])
            .with_validation(ValidationReport {
                results: vec![ConnectionValidation {
                    connection_id: 1,
                    platform: Some(Platform::WordPress),
                    is_valid: false,
                    error: Some("Token revoked".into()),
                }],
            }),
    );
    service.connections().await.unwrap();
    service.validate_all().await.unwrap();
    assert!(service.cache().is_stale(QueryKey::Connections).await);
    api.clear_calls();

    let err = service.publish_now(10, 1, None).await.unwrap_err();
    let PublishError::ConnectionInactive { id, error } = err else {
        panic!("expected inactive error, got {err:?}");
    };
    assert_eq!(id, 1);
    assert_eq!(error.as_deref(), Some("Token revoked"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn publish_now_cold_cache_reads_list_but_never_publishes_inactive() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::WordPress, false)]));
    let err = service.publish_now(10, 1, None).await.unwrap_err();
    assert!(matches!(err, PublishError::ConnectionInactive { id: 1, .. }));
    assert_eq!(api.calls(), vec![Call::ListConnections]);
}

#[tokio::test]
async fn publish_now_unknown_connection_never_publishes() {
    let (api, _, service) = setup(FakeApi::new());
    let err = service.publish_now(10, 42, None).await.unwrap_err();
    assert!(matches!(err, PublishError::ConnectionNotFound(42)));
    assert_eq!(api.calls(), vec![Call::ListConnections]);
}

#[tokio::test]
async fn publish_now_success_invalidates_all_views() {
    let (api, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(1, Platform::WordPress, true)])
            .with_content(vec![ContentItem {
                id: 10,
                title: "Best budget headphones".into(),
                status: Some("draft".into()),
            }]),
    );
    warm(&service).await;
    api.clear_calls();

    let settings = PublishSettings {
        title: Some("Best budget headphones 2026".into()),
        excerpt: None,
        tags: vec!["audio".into()],
    };
    let record = service
        .publish_now(10, 1, Some(settings.clone()))
        .await
        .unwrap();
    assert_eq!(record.status, PublicationStatus::Published);

    let Call::PublishNow(request) = &api.calls()[0] else {
        panic!("expected publish call");
    };
    assert_eq!(request.publish_settings, Some(settings));
    for key in PUBLISH_INVALIDATES {
        assert!(service.cache().is_stale(key).await, "{key} not invalidated");
    }
}

#[tokio::test]
async fn publish_now_drops_empty_settings() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::Medium, true)]));
    service
        .publish_now(10, 1, Some(PublishSettings::default()))
        .await
        .unwrap();
    let Some(Call::PublishNow(request)) = api.calls().last().cloned() else {
        panic!("expected publish call");
    };
    assert_eq!(request.publish_settings, None);
}

#[tokio::test]
async fn publish_failure_leaves_cache_fresh() {
    let (_, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(1, Platform::WordPress, true)])
            .failing_with(500, RemoteError::new("Upstream exploded")),
    );
    warm(&service).await;

    let err = service.publish_now(10, 1, None).await.unwrap_err();
    assert!(!err.is_local());
    for key in QueryKey::ALL {
        assert!(!service.cache().is_stale(key).await);
    }
}

// =============================================================================
// Remote error mapping
// =============================================================================

fn permission_error() -> RemoteError {
    RemoteError {
        details: Some("rest_cannot_create: Sorry, you are not allowed to create posts".into()),
        ..RemoteError::new("Failed to publish to WordPress")
    }
}

#[tokio::test]
async fn permission_error_is_mapped_for_publish_and_schedule() {
    let (_, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(1, Platform::WordPress, true)])
            .failing_with(403, permission_error()),
    );

    let publish = service.publish_now(10, 1, None).await.unwrap_err();
    let schedule = service
        .schedule(&ScheduleDraft {
            content_id: Some(10),
            platform_connection_id: Some(1),
            scheduled_at: "2026-10-19T13:00:00Z".into(),
            publish_settings: None,
        })
        .await
        .unwrap_err();

    for err in [publish, schedule] {
        let notice = err.notice();
        assert_eq!(notice.title, PERMISSION_TITLE);
        assert_eq!(notice.display, NoticeDuration::Extended);
        assert!(!notice.retry_recommended);
    }
}

#[tokio::test]
async fn dns_error_keeps_retry_flag() {
    let body = RemoteError {
        retry_recommended: Some(false),
        technical: Some("getaddrinfo ENOTFOUND blog.example.com".into()),
        ..RemoteError::new("Could not reach your site")
    };
    let (_, _, service) = setup(
        FakeApi::new()
            .with_connections(vec![connection(1, Platform::WordPress, true)])
            .failing_with(502, body),
    );

    let notice = service.publish_now(10, 1, None).await.unwrap_err().notice();
    assert_eq!(notice.title, NETWORK_TITLE);
    assert!(!notice.retry_recommended);
}

// =============================================================================
// Scheduling
// =============================================================================

#[tokio::test]
async fn schedule_rejects_three_minutes_and_accepts_ten() {
    let (api, _, service) = setup(FakeApi::new());
    warm(&service).await;
    api.clear_calls();

    let mut form = ScheduleDraft {
        content_id: Some(10),
        platform_connection_id: Some(1),
        scheduled_at: "2026-10-19T12:03:00Z".into(),
        publish_settings: None,
    };
    let err = service.schedule(&form).await.unwrap_err();
    assert!(matches!(
        err,
        PublishError::Schedule(ScheduleError::TooSoon { .. })
    ));
    assert_eq!(
        err.notice().description,
        "Scheduled time must be at least 5 minutes in the future"
    );
    assert!(api.calls().is_empty());

    form.scheduled_at = "2026-10-19T12:10".into();
    let item = service.schedule(&form).await.unwrap();
    assert_eq!(item.scheduled_at, at("2026-10-19T12:10:00Z"));
    assert_eq!(item.status, PublicationStatus::Pending);

    let Call::Schedule(request) = &api.calls()[0] else {
        panic!("expected schedule call");
    };
    let body = serde_json::to_value(request).unwrap();
    assert_eq!(body["scheduledAt"], "2026-10-19T12:10:00Z");
    assert_eq!(body["contentId"], 10);
    for key in PUBLISH_INVALIDATES {
        assert!(service.cache().is_stale(key).await);
    }
}

#[tokio::test]
async fn schedule_uses_clock_at_submission() {
    let (api, clock, service) = setup(FakeApi::new());
    let form = ScheduleDraft {
        content_id: Some(10),
        platform_connection_id: Some(1),
        scheduled_at: "2026-10-19T12:06:00Z".into(),
        publish_settings: None,
    };
    // Valid when the form was opened, too close by the time it is submitted.
    clock.advance(TimeDelta::minutes(2));
    let err = service.schedule(&form).await.unwrap_err();
    assert!(matches!(
        err,
        PublishError::Schedule(ScheduleError::TooSoon { .. })
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn cancel_rejects_items_already_picked_up() {
    let (api, _, service) = setup(FakeApi::new().with_scheduled(vec![
        scheduled(1, PublicationStatus::Published),
        scheduled(2, PublicationStatus::Pending),
    ]));
    warm(&service).await;

    let err = service.cancel_scheduled(1).await.unwrap_err();
    assert!(matches!(
        err,
        PublishError::NotCancellable {
            id: 1,
            status: PublicationStatus::Published
        }
    ));
    assert!(!api.calls().contains(&Call::CancelScheduled(1)));

    service.cancel_scheduled(2).await.unwrap();
    assert!(api.calls().contains(&Call::CancelScheduled(2)));
    assert!(service.cache().is_stale(QueryKey::Scheduled).await);
    assert!(!service.cache().is_stale(QueryKey::Connections).await);
    assert!(!service.cache().is_stale(QueryKey::History).await);
}

#[tokio::test(start_paused = true)]
async fn schedule_floor_follows_the_clock() {
    let (_, clock, service) = setup(FakeApi::new());
    let floor = service.schedule_floor(Duration::from_secs(60));
    let mut rx = floor.subscribe();
    assert_eq!(floor.current(), at("2026-10-19T12:05:00Z"));

    clock.advance(TimeDelta::minutes(1));
    tokio::time::advance(Duration::from_secs(60)).await;
    rx.changed().await.unwrap();
    assert_eq!(floor.current(), at("2026-10-19T12:06:00Z"));
}

// =============================================================================
// Cached reads
// =============================================================================

#[tokio::test]
async fn reads_are_served_from_cache_until_invalidated() {
    let (api, _, service) =
        setup(FakeApi::new().with_connections(vec![connection(1, Platform::Ghost, true)]));
    service.connections().await.unwrap();
    service.connection(1).await.unwrap();
    assert_eq!(api.calls(), vec![Call::ListConnections]);

    service.cache().invalidate(QueryKey::Connections).await;
    service.connections().await.unwrap();
    assert_eq!(api.calls(), vec![Call::ListConnections, Call::ListConnections]);
}

#[tokio::test]
async fn history_is_loaded_once() {
    let entry = firekyt_core::PublicationHistoryEntry {
        id: 1,
        content_title: "Best budget headphones".into(),
        platform: Platform::WordPress,
        status: PublicationStatus::Published,
        published_at: at("2026-10-18T08:00:00Z"),
        platform_url: Some("https://example.com/?p=10".into()),
        metrics: None,
    };
    let (api, _, service) = setup(FakeApi::new().with_history(vec![entry.clone()]));
    assert_eq!(service.history().await.unwrap(), vec![entry.clone()]);
    assert_eq!(service.history().await.unwrap(), vec![entry]);
    assert_eq!(api.calls(), vec![Call::ListHistory]);
}
