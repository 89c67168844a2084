use super::{at, create_test_storage, summary};
use crate::traits::TermStore;
use termsift_core::{CoreError, ReconcileAction};

use crate::error::StorageError;

fn terms_with_counts(storage: &crate::Storage, user: &str) -> Vec<(String, u32)> {
    storage.find_by_user(user).unwrap().into_iter().map(|s| (s.term, s.count)).collect()
}

#[test]
fn upsert_inserts_then_overwrites() {
    let (storage, _temp_dir) = create_test_storage();
    storage.upsert(&summary("u1", "rails", 1)).unwrap();
    storage.upsert(&summary("u1", "rails", 7)).unwrap();
    assert_eq!(terms_with_counts(&storage, "u1"), vec![("rails".to_owned(), 7)]);
}

#[test]
fn delete_many_removes_only_named_terms() {
    let (storage, _temp_dir) = create_test_storage();
    for term in ["he", "hell", "rust"] {
        storage.upsert(&summary("u1", term, 1)).unwrap();
    }
    storage.upsert(&summary("u2", "he", 1)).unwrap();

    let deleted = storage.delete_many("u1", &["he".to_owned(), "hell".to_owned()]).unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(terms_with_counts(&storage, "u1"), vec![("rust".to_owned(), 1)]);
    assert_eq!(terms_with_counts(&storage, "u2"), vec![("he".to_owned(), 1)]);
}

#[test]
fn reconcile_retracts_prefixes() {
    let (storage, _temp_dir) = create_test_storage();
    storage.upsert(&summary("u1", "he", 1)).unwrap();
    storage.upsert(&summary("u1", "hell", 1)).unwrap();

    let plan = storage.reconcile_term("u1", "hello", at(60)).unwrap();
    assert_eq!(plan.action, ReconcileAction::Created);
    assert_eq!(plan.retracted_terms(), vec!["he".to_owned(), "hell".to_owned()]);
    assert_eq!(terms_with_counts(&storage, "u1"), vec![("hello".to_owned(), 1)]);
}

#[test]
fn reconcile_repeat_increments_once_per_call() {
    let (storage, _temp_dir) = create_test_storage();
    storage.reconcile_term("u1", "rails", at(0)).unwrap();
    storage.reconcile_term("u1", "rails", at(1)).unwrap();
    let plan = storage.reconcile_term("u1", "rails", at(2)).unwrap();

    assert_eq!(plan.action, ReconcileAction::Incremented);
    let rows = storage.find_by_user("u1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 3);
    assert_eq!(rows[0].last_seen_at, at(2));
}

#[test]
fn reconcile_exact_match_keeps_siblings() {
    let (storage, _temp_dir) = create_test_storage();
    storage.upsert(&summary("u1", "rails", 3)).unwrap();
    storage.upsert(&summary("u1", "ruby", 2)).unwrap();

    storage.reconcile_term("u1", "rails", at(5)).unwrap();
    assert_eq!(
        terms_with_counts(&storage, "u1"),
        vec![("rails".to_owned(), 4), ("ruby".to_owned(), 2)]
    );
}

#[test]
fn reconcile_never_touches_other_users() {
    let (storage, _temp_dir) = create_test_storage();
    storage.upsert(&summary("u2", "he", 4)).unwrap();
    storage.reconcile_term("u1", "hello", at(0)).unwrap();
    assert_eq!(terms_with_counts(&storage, "u2"), vec![("he".to_owned(), 4)]);
}

#[test]
fn reconcile_rejects_empty_term_without_writing() {
    let (storage, _temp_dir) = create_test_storage();
    storage.upsert(&summary("u1", "he", 1)).unwrap();
    let err = storage.reconcile_term("u1", "", at(0)).unwrap_err();
    assert!(matches!(err, StorageError::Domain(CoreError::InvalidInput(_))));
    assert_eq!(terms_with_counts(&storage, "u1"), vec![("he".to_owned(), 1)]);
}

#[tokio::test]
async fn concurrent_reconciles_for_one_user_do_not_lose_updates() {
    let (storage, _temp_dir) = create_test_storage();
    let mut handles = Vec::new();
    for i in 0..8 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            TermStore::reconcile_term(&storage, "u1", "rails", at(i)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let rows = TermStore::find_by_user(&storage, "u1").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 8);
}
