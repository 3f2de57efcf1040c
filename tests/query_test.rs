//! Integration tests for status listing.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeStore, Mode, SeededStore, record_at};
use intake::adapter::memory::{MemoryQueue, MemoryStore};
use intake::error::{Error, PipelineError};
use intake::model::Request;
use intake::service::{AdmissionService, QueryService};

#[tokio::test]
async fn listing_is_ordered_by_created_at_descending() {
    let store = SeededStore(vec![record_at(100), record_at(300), record_at(200)]);
    let query = QueryService::new(Arc::new(store));

    let listed = query.list_requests().await.unwrap();

    let order: Vec<i64> = listed.iter().map(|r| r.created_at).collect();
    assert_eq!(order, vec![300, 200, 100]);
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let query = QueryService::new(Arc::new(MemoryStore::new()));
    assert!(query.list_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn other_partitions_are_not_listed() {
    let foreign = Request {
        partition_key: "someone-else".to_string(),
        ..record_at(500)
    };
    let store = SeededStore(vec![record_at(1), foreign]);
    let query = QueryService::new(Arc::new(store));

    let listed = query.list_requests().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].created_at, 1);
}

#[tokio::test]
async fn read_failure_is_reported_not_emptied() {
    let query = QueryService::new(FakeStore::new(Mode::Ok, Mode::Fail));

    let err = query.list_requests().await.unwrap_err();
    assert!(matches!(err, PipelineError::Query { .. }), "got {err:?}");
}

#[tokio::test(start_paused = true)]
async fn read_timeout_is_a_query_failure() {
    let query = QueryService::new(FakeStore::new(Mode::Ok, Mode::Stall))
        .with_timeout(Duration::from_millis(50));

    let err = query.list_requests().await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Query {
            cause: Error::Timeout(_)
        }
    ));
}

#[tokio::test]
async fn admitted_requests_list_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let admission = AdmissionService::new(store.clone(), Arc::new(MemoryQueue::new()));
    let query = QueryService::new(store);

    for _ in 0..3 {
        admission.admit().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let listed = query.list_requests().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn concurrent_reads_agree() {
    let store = SeededStore(vec![record_at(5), record_at(9), record_at(7)]);
    let query = QueryService::new(Arc::new(store));

    let (a, b) = tokio::join!(query.list_requests(), query.list_requests());
    assert_eq!(a.unwrap(), b.unwrap());
}
