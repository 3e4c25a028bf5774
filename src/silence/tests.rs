use std::sync::Arc;

use chrono::Duration;

use crate::alerting::mock_backend::{Call, MockBackend};
use crate::error_handling::types::{BackendError, SchedulerError, ValidationError, WindowError};
use crate::silence::orchestrator::SilenceOrchestrator;
use crate::silence::types::{Matcher, Repeat, Schedule, SilenceRequest};
use crate::silence::window::parse_timestamp;

// Helper to build a valid request repeated `count` times
fn request(interval: &str, count: i64) -> SilenceRequest {
    SilenceRequest {
        id: String::new(),
        comment: "weekly db maintenance".to_string(),
        created_by: "ops@example.com".to_string(),
        matchers: vec![
            Matcher::new("job", "postgres", false),
            Matcher::new("instance", "db-0[1-3]", true),
        ],
        schedule: Schedule {
            start_time: "2020-11-01T22:00:00.000Z".to_string(),
            end_time: "2020-11-01T23:30:00.000Z".to_string(),
            repeat: Repeat {
                enabled: true,
                interval: interval.to_string(),
                count,
            },
        },
    }
}

fn orchestrator(backend: &Arc<MockBackend>) -> SilenceOrchestrator {
    SilenceOrchestrator::new(backend.clone())
}

#[tokio::test]
async fn run_creates_one_silence_per_window_in_order() {
    let backend = Arc::new(MockBackend::new());
    let result = orchestrator(&backend).run(&request("w", 4)).await.unwrap();

    assert_eq!(result.attempted, 4);
    assert_eq!(result.succeeded, 4);
    assert!(result.failed_indices.is_empty());
    assert!(result.is_success());
    assert_eq!(
        result.created_ids,
        vec!["silence-0", "silence-1", "silence-2", "silence-3"]
    );
    assert_eq!(result.summary(), "4/4 new silences created");

    let first_start = parse_timestamp("2020-11-01T22:00:00.000Z").unwrap();
    let creates = backend.create_calls();
    assert_eq!(creates.len(), 4);
    for (i, (start, end)) in creates.iter().enumerate() {
        assert_eq!(*start, first_start + Duration::weeks(i as i64));
        assert_eq!(*end - *start, Duration::minutes(90));
    }
}

#[tokio::test]
async fn run_continues_past_a_failed_window() {
    let backend = Arc::new(MockBackend::new().failing_creates(&[2]));
    let result = orchestrator(&backend).run(&request("d", 5)).await.unwrap();

    assert_eq!(backend.create_calls().len(), 5);
    assert_eq!(result.attempted, 5);
    assert_eq!(result.succeeded, 4);
    assert_eq!(result.failed_indices, vec![2]);
    assert!(!result.is_success());
    assert_eq!(result.summary(), "4/5 new silences created");
    assert_eq!(
        result.created_ids,
        vec!["silence-0", "silence-1", "silence-3", "silence-4"]
    );

    let outcome = &result.outcomes[2];
    assert_eq!(outcome.index, 2);
    assert!(matches!(
        outcome.result,
        Err(WindowError::Backend(BackendError::HttpStatus { code: 500, .. }))
    ));
}

#[tokio::test]
async fn run_records_every_failure() {
    let backend = Arc::new(MockBackend::new().failing_creates(&[0, 1, 2]));
    let result = orchestrator(&backend).run(&request("h", 3)).await.unwrap();

    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed_indices, vec![0, 1, 2]);
    assert!(result.created_ids.is_empty());
    assert_eq!(result.summary(), "0/3 new silences created");
}

#[tokio::test]
async fn run_rejects_invalid_request_without_backend_calls() {
    let backend = Arc::new(MockBackend::new());
    let orchestrator = orchestrator(&backend);

    let mut no_comment = request("h", 2);
    no_comment.comment.clear();
    assert_eq!(
        orchestrator.run(&no_comment).await,
        Err(ValidationError::EmptyComment)
    );

    let too_many = request("h", 100);
    assert_eq!(
        orchestrator.run(&too_many).await,
        Err(ValidationError::CountTooHigh)
    );

    let mut no_matchers = request("h", 1);
    no_matchers.matchers.clear();
    assert_eq!(
        orchestrator.run(&no_matchers).await,
        Err(ValidationError::NoMatchers)
    );

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn run_with_empty_interval_repeats_the_same_window() {
    let backend = Arc::new(MockBackend::new());
    let result = orchestrator(&backend).run(&request("", 3)).await.unwrap();

    assert_eq!(result.succeeded, 3);
    let creates = backend.create_calls();
    assert!(creates.iter().all(|w| *w == creates[0]));
}

#[tokio::test]
async fn update_expires_then_recreates() {
    let backend = Arc::new(MockBackend::new());
    let new_id = orchestrator(&backend)
        .update(
            "old-id",
            "2020-11-02T22:00:00.000Z",
            "2020-11-02T23:00:00.000Z",
            &request("", 1),
        )
        .await
        .unwrap();

    assert_eq!(new_id, "silence-0");
    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Expire("old-id".to_string()));
    assert!(matches!(calls[1], Call::Create { .. }));
}

#[tokio::test]
async fn update_never_creates_when_expire_fails() {
    let expire_err = BackendError::HttpStatus {
        code: 500,
        body: "silence old-id already expired".to_string(),
    };
    let backend = Arc::new(MockBackend::new().failing_expire(expire_err.clone()));

    let err = orchestrator(&backend)
        .update(
            "old-id",
            "2020-11-02T22:00:00.000Z",
            "2020-11-02T23:00:00.000Z",
            &request("", 1),
        )
        .await;

    assert_eq!(err, Err(SchedulerError::Backend(expire_err)));
    assert!(backend.create_calls().is_empty());
}

#[tokio::test]
async fn update_leaves_silence_expired_when_recreate_fails() {
    let backend = Arc::new(MockBackend::new().failing_creates(&[0]));

    let err = orchestrator(&backend)
        .update(
            "old-id",
            "2020-11-02T22:00:00.000Z",
            "2020-11-02T23:00:00.000Z",
            &request("", 1),
        )
        .await;

    assert!(matches!(err, Err(SchedulerError::Backend(BackendError::HttpStatus { .. }))));
    assert_eq!(backend.calls()[0], Call::Expire("old-id".to_string()));
}

#[tokio::test]
async fn update_with_malformed_time_touches_nothing() {
    let backend = Arc::new(MockBackend::new());

    let err = orchestrator(&backend)
        .update("old-id", "tomorrow", "2020-11-02T23:00:00.000Z", &request("", 1))
        .await;

    assert!(matches!(err, Err(SchedulerError::Time(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn list_silences_filters_only_when_asked() {
    let backend = Arc::new(MockBackend::new().with_silences(&[
        ("a", "active"),
        ("b", "expired"),
        ("c", "pending"),
    ]));
    let orchestrator = orchestrator(&backend);

    assert_eq!(orchestrator.list_silences(false).await.unwrap().len(), 3);

    let filtered = orchestrator.list_silences(true).await.unwrap();
    let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn single_calls_propagate_backend_errors() {
    let expire_err = BackendError::RequestFailed("connection refused".to_string());
    let backend = Arc::new(MockBackend::new().failing_expire(expire_err.clone()));
    let orchestrator = orchestrator(&backend);

    assert_eq!(
        orchestrator.expire_silence("x").await,
        Err(SchedulerError::Backend(expire_err))
    );
    assert!(matches!(
        orchestrator.get_silence("missing").await,
        Err(SchedulerError::Backend(BackendError::HttpStatus { code: 404, .. }))
    ));
}

#[tokio::test]
async fn run_counts_window_past_year_9999_as_failed() {
    let backend = Arc::new(MockBackend::new());
    let mut req = request("h", 2);
    req.schedule.start_time = "9999-12-31T23:00:00.000Z".to_string();
    req.schedule.end_time = "9999-12-31T23:30:00.000Z".to_string();

    let result = orchestrator(&backend).run(&req).await.unwrap();

    assert_eq!(result.attempted, 2);
    assert_eq!(result.failed_indices, vec![1]);
    assert!(matches!(
        result.outcomes[1].result,
        Err(WindowError::Time(_))
    ));
    assert_eq!(backend.create_calls().len(), 1);
}
