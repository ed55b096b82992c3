//! Integration tests for moving bookmarks within an owner's list.

#[path = "../common/mod.rs"]
mod common;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use common::{is_dense, memory_store, new_owner, positions_of, seed_bookmarks, FaultyStore};
use mybookmarks::database::BookmarkStore;
use mybookmarks::services::bookmark_service::BookmarkService;
use mybookmarks::services::reorder_engine::ReorderEngine;
use mybookmarks::types::errors::BookmarkError;

async fn setup(count: usize) -> (Arc<dyn BookmarkStore>, BookmarkService, i64, Vec<i64>) {
    let store: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(store.as_ref(), "alice").await;
    let service = BookmarkService::new(Arc::clone(&store));
    let ids = seed_bookmarks(&service, owner, count).await;
    (store, service, owner, ids)
}

#[tokio::test]
async fn test_move_last_to_first_of_three() {
    let (store, service, owner, ids) = setup(3).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    service.reorder(owner, c, a).await.unwrap();

    assert_eq!(positions_of(store.as_ref(), owner, &[a, b, c]).await, vec![2, 3, 1]);
}

#[tokio::test]
async fn test_move_earlier_shifts_only_the_block_between() {
    let (store, service, owner, ids) = setup(10).await;

    // bookmark at 5 takes the slot of the bookmark at 2
    service.reorder(owner, ids[4], ids[1]).await.unwrap();

    assert_eq!(
        positions_of(store.as_ref(), owner, &ids).await,
        vec![1, 3, 4, 5, 2, 6, 7, 8, 9, 10]
    );
    assert!(is_dense(store.as_ref(), owner).await);
}

#[tokio::test]
async fn test_move_later_shifts_block_up() {
    let (store, service, owner, ids) = setup(6).await;

    service.reorder(owner, ids[1], ids[4]).await.unwrap();

    assert_eq!(
        positions_of(store.as_ref(), owner, &ids).await,
        vec![1, 5, 2, 3, 4, 6]
    );
}

#[tokio::test]
async fn test_move_onto_itself_is_noop() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let ids = seed_bookmarks(&BookmarkService::new(Arc::clone(&inner)), owner, 3).await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    let engine = ReorderEngine::new(faulty.clone());

    engine.reorder(owner, ids[1], ids[1]).await.unwrap();

    assert_eq!(faulty.calls("shift_positions"), 0);
    assert_eq!(faulty.calls("set_position"), 0);
    assert_eq!(positions_of(inner.as_ref(), owner, &ids).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_missing_bookmark_fails_before_any_write() {
    let (store, service, owner, ids) = setup(3).await;

    let result = service.reorder(owner, ids[2], 9_999).await;

    assert!(matches!(result, Err(BookmarkError::NotFound(9_999))));
    assert_eq!(positions_of(store.as_ref(), owner, &ids).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_never_touches_other_owners() {
    let (store, service, alice, alice_ids) = setup(4).await;
    let bob = new_owner(store.as_ref(), "bob").await;
    let bob_ids = seed_bookmarks(&service, bob, 4).await;

    service.reorder(alice, alice_ids[3], alice_ids[0]).await.unwrap();

    assert_eq!(positions_of(store.as_ref(), bob, &bob_ids).await, vec![1, 2, 3, 4]);
    // another owner's bookmark cannot be used as the target
    let result = service.reorder(alice, alice_ids[0], bob_ids[0]).await;
    assert!(matches!(result, Err(BookmarkError::NotFound(_))));
}

#[tokio::test]
async fn test_shift_failure_leaves_sequence_intact() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let ids = seed_bookmarks(&BookmarkService::new(Arc::clone(&inner)), owner, 4).await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    faulty.fail("shift_positions");
    let engine = ReorderEngine::new(faulty.clone());

    let result = engine.reorder(owner, ids[3], ids[0]).await;

    match result {
        Err(e) => {
            assert!(matches!(e, BookmarkError::Store(_)));
            assert!(!e.is_consistency_hazard());
        }
        Ok(()) => panic!("expected the shift failure to surface"),
    }
    assert_eq!(faulty.calls("set_position"), 0);
    assert_eq!(positions_of(inner.as_ref(), owner, &ids).await, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_failed_placement_after_shift_is_a_hazard_and_reconcile_repairs_it() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let ids = seed_bookmarks(&BookmarkService::new(Arc::clone(&inner)), owner, 5).await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    faulty.fail("set_position");
    let service = BookmarkService::new(faulty.clone());

    let result = service.reorder(owner, ids[4], ids[1]).await;

    assert!(result.as_ref().is_err_and(|e| e.is_consistency_hazard()));
    assert!(!is_dense(inner.as_ref(), owner).await);

    let moved = service.reconcile_sequence(owner).await.unwrap();
    assert!(moved > 0);
    assert!(is_dense(inner.as_ref(), owner).await);
}

#[tokio::test]
async fn test_mover_deleted_mid_reorder_is_a_hazard_without_store_error() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let ids = seed_bookmarks(&BookmarkService::new(Arc::clone(&inner)), owner, 4).await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    faulty.delay("shift_positions", Duration::from_millis(200));
    let service = BookmarkService::new(faulty.clone());

    let (result, deleted) = tokio::join!(service.reorder(owner, ids[3], ids[0]), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        inner.delete_bookmark(owner, ids[3]).await.unwrap()
    });

    assert_eq!(deleted, Some(4));
    match result {
        Err(err @ BookmarkError::ConsistencyHazard { .. }) => assert!(err.source().is_none()),
        other => panic!("expected a consistency hazard, got {:?}", other),
    }
    assert_eq!(faulty.calls("set_position"), 1);
}
