use termsift_core::NewSearchEvent;

use super::{create_test_engine, finalize, keystroke, terms_with_counts};
use crate::{NoOpReason, ServiceError, SessionOutcome};

#[tokio::test]
async fn keystrokes_are_stored_without_finalizing() {
    let (engine, storage, _temp_dir) = create_test_engine();
    let recorded = engine.events.record_event(keystroke("u1", "s1", "he", 0)).await.unwrap();

    assert!(recorded.outcome.is_none());
    assert!(recorded.event.id > 0);
    assert_eq!(recorded.event.raw_value, "he");
    assert!(terms_with_counts(&storage, "u1").await.is_empty());
}

#[tokio::test]
async fn finalize_event_processes_the_session() {
    let (engine, storage, _temp_dir) = create_test_engine();
    engine.events.record_event(keystroke("u1", "s1", "h", 0)).await.unwrap();
    engine.events.record_event(keystroke("u1", "s1", "he", 1)).await.unwrap();
    let recorded =
        engine.events.record_event(finalize("u1", "s1", "hello world", 2)).await.unwrap();

    let summary = recorded.outcome.as_ref().and_then(SessionOutcome::summary).unwrap();
    assert_eq!(summary.term, "hello world");
    assert_eq!(terms_with_counts(&storage, "u1").await, vec![("hello world".to_owned(), 1)]);

    let events = engine.events.events("u1", "s1").await.unwrap();
    let values: Vec<&str> = events.iter().map(|e| e.raw_value.as_str()).collect();
    assert_eq!(values, vec!["h", "he", "hello world"]);
}

#[tokio::test]
async fn meaningless_finalize_is_still_recorded() {
    let (engine, _storage, _temp_dir) = create_test_engine();
    let recorded = engine.events.record_event(finalize("u1", "s1", "a", 0)).await.unwrap();

    assert_eq!(
        recorded.outcome,
        Some(SessionOutcome::NoOp(NoOpReason::NotMeaningful { term: "a".to_owned() }))
    );
    assert_eq!(engine.events.events("u1", "s1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_fields_are_rejected_before_append() {
    let (engine, _storage, _temp_dir) = create_test_engine();
    let err = engine
        .events
        .record_event(NewSearchEvent::keystroke(" ", "s1", ""))
        .await
        .unwrap_err();

    match err {
        ServiceError::InvalidInput(msg) => {
            assert!(msg.contains("user_id"));
            assert!(msg.contains("raw_value"));
            assert!(!msg.contains("session_id"));
        },
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert!(engine.events.events(" ", "s1").await.unwrap().is_empty());
}

#[tokio::test]
async fn events_without_timestamp_get_one() {
    let (engine, _storage, _temp_dir) = create_test_engine();
    let recorded = engine
        .events
        .record_event(NewSearchEvent::keystroke("u1", "s1", "rails"))
        .await
        .unwrap();
    let stored = engine.events.events("u1", "s1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, recorded.event.id);
}
