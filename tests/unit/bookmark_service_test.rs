//! Integration tests for the BookmarkService public API.
//!
//! Covers deletion with compaction, paged listing, and the category-level
//! operations, using an in-memory SQLite store.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use rstest::rstest;

use common::{all_bookmarks, is_dense, memory_store, new_owner, positions_of, seed_bookmarks, FaultyStore};
use mybookmarks::database::BookmarkStore;
use mybookmarks::services::bookmark_service::BookmarkService;
use mybookmarks::types::bookmark::{BookmarkDraft, CategoryFilter};
use mybookmarks::types::outcome::Outcome;

async fn setup() -> (Arc<dyn BookmarkStore>, BookmarkService, i64) {
    let store: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(store.as_ref(), "alice").await;
    let service = BookmarkService::new(Arc::clone(&store));
    (store, service, owner)
}

async fn add(service: &BookmarkService, owner: i64, name: &str, category: &str) {
    let draft = BookmarkDraft::new(name, format!("https://{}.example", name.to_lowercase()), category);
    let outcome = service.add_bookmark(owner, &draft).await.unwrap();
    assert_eq!(outcome, Outcome::Accepted, "adding {}", name);
}

#[tokio::test]
async fn test_add_appends_at_end() {
    let (store, service, owner) = setup().await;
    let ids = seed_bookmarks(&service, owner, 3).await;

    add(&service, owner, "Last", "").await;

    let last = all_bookmarks(&service, owner).await.pop().unwrap();
    assert_eq!(last.name, "Last");
    assert_eq!(last.seq, 4);
    assert_eq!(positions_of(store.as_ref(), owner, &ids).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_delete_compacts_following_positions() {
    let (store, service, owner) = setup().await;
    let ids = seed_bookmarks(&service, owner, 5).await;

    service.delete_bookmark(owner, ids[1]).await.unwrap();

    assert_eq!(
        positions_of(store.as_ref(), owner, &[ids[0], ids[2], ids[3], ids[4]]).await,
        vec![1, 2, 3, 4]
    );
    assert!(is_dense(store.as_ref(), owner).await);
}

#[tokio::test]
async fn test_delete_of_missing_bookmark_is_ok() {
    let (store, service, owner) = setup().await;
    let ids = seed_bookmarks(&service, owner, 2).await;

    service.delete_bookmark(owner, 9_999).await.unwrap();

    assert_eq!(positions_of(store.as_ref(), owner, &ids).await, vec![1, 2]);
}

#[tokio::test]
async fn test_failed_compaction_after_delete_is_a_hazard() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let ids = seed_bookmarks(&BookmarkService::new(Arc::clone(&inner)), owner, 3).await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    faulty.fail("shift_positions");
    let service = BookmarkService::new(faulty.clone());

    let err = service.delete_bookmark(owner, ids[0]).await.unwrap_err();

    assert!(err.is_consistency_hazard());
    assert_eq!(inner.positions(owner).await.unwrap(), vec![2, 3]);

    faulty.heal("shift_positions");
    service.reconcile_sequence(owner).await.unwrap();
    assert!(is_dense(inner.as_ref(), owner).await);
}

#[tokio::test]
async fn test_list_pages_in_position_order() {
    let (store, _service, owner) = setup().await;
    let service = BookmarkService::with_page_size(Arc::clone(&store), 2);
    let ids = seed_bookmarks(&service, owner, 5).await;

    let first = service.list_bookmarks(owner, CategoryFilter::All, 0).await.unwrap();
    let third = service.list_bookmarks(owner, CategoryFilter::All, 4).await.unwrap();
    let negative = service.list_bookmarks(owner, CategoryFilter::All, -3).await.unwrap();

    assert_eq!(first.iter().map(|b| b.id).collect::<Vec<_>>(), ids[..2].to_vec());
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].id, ids[4]);
    assert_eq!(negative, first);
}

#[tokio::test]
async fn test_list_filters_by_category() {
    let (store, service, owner) = setup().await;
    add(&service, owner, "Rust", "Dev").await;
    add(&service, owner, "News", "").await;
    add(&service, owner, "Docs", "Dev").await;
    let dev = store.find_category(owner, "Dev").await.unwrap().unwrap();

    let in_dev = service.list_bookmarks(owner, CategoryFilter::Category(dev), 0).await.unwrap();
    let loose = service.list_bookmarks(owner, CategoryFilter::Uncategorized, 0).await.unwrap();

    assert_eq!(in_dev.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(), vec!["Rust", "Docs"]);
    assert!(in_dev.iter().all(|b| b.category == "Dev"));
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].name, "News");
    assert_eq!(loose[0].category, "");
}

#[tokio::test]
async fn test_category_counts_are_sorted_and_skip_empty_categories() {
    let (store, service, owner) = setup().await;
    add(&service, owner, "Rust", "Work").await;
    add(&service, owner, "Docs", "Dev").await;
    add(&service, owner, "Crates", "Dev").await;
    add(&service, owner, "Loose", "").await;
    store.insert_category(owner, "Empty").await.unwrap();

    let counts = service.list_categories(owner).await.unwrap();

    let summary: Vec<(&str, i64)> = counts.iter().map(|c| (c.category.as_str(), c.count)).collect();
    assert_eq!(summary, vec![("Dev", 2), ("Work", 1)]);
}

#[tokio::test]
async fn test_rename_category_is_visible_only_to_its_owner() {
    let (store, service, alice) = setup().await;
    let bob = new_owner(store.as_ref(), "bob").await;
    add(&service, alice, "Rust", "Work").await;
    add(&service, alice, "Docs", "Work").await;
    add(&service, bob, "Rust", "Work").await;

    let outcome = service.rename_category(alice, "Work", "Job").await.unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    assert!(all_bookmarks(&service, alice).await.iter().all(|b| b.category == "Job"));
    assert!(all_bookmarks(&service, bob).await.iter().all(|b| b.category == "Work"));
}

#[rstest]
#[case::empty("   ", 1, "New category name is empty.")]
#[case::reserved("Uncategorized", 1, "New category name is not allowed.")]
#[case::same("Work", 0, "New category is same as old category.")]
#[case::too_long("sixteen chars!!!", 1, "Category name exceeded length limit.")]
#[case::taken("Dev", 1, "Category Dev is already existed.")]
#[tokio::test]
async fn test_rename_category_rules(#[case] new: &str, #[case] code: i32, #[case] message: &str) {
    let (_store, service, owner) = setup().await;
    add(&service, owner, "Rust", "Work").await;
    add(&service, owner, "Docs", "Dev").await;

    let outcome = service.rename_category(owner, "Work", new).await.unwrap();

    assert_eq!(outcome.code(), code);
    assert_eq!(outcome.message(), Some(message));
    let rust = &all_bookmarks(&service, owner).await[0];
    assert_eq!(rust.category, "Work");
}

#[tokio::test]
async fn test_rename_onto_category_left_by_rejected_add() {
    let (store, service, owner) = setup().await;
    add(&service, owner, "Rust", "Work").await;
    let rejected = service
        .add_bookmark(owner, &BookmarkDraft::new("Rust", "https://other.example", "Foo"))
        .await
        .unwrap();
    assert_eq!(rejected.code(), 1);
    assert!(store.find_category(owner, "Foo").await.unwrap().is_some());

    let outcome = service.rename_category(owner, "Work", "Foo").await.unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    let counts = service.list_categories(owner).await.unwrap();
    let summary: Vec<(&str, i64)> = counts.iter().map(|c| (c.category.as_str(), c.count)).collect();
    assert_eq!(summary, vec![("Foo", 1)]);
    assert_eq!(all_bookmarks(&service, owner).await[0].category, "Foo");
    assert!(store.find_category(owner, "Work").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_category_leaves_bookmarks_uncategorized() {
    let (store, service, owner) = setup().await;
    add(&service, owner, "Rust", "Work").await;
    add(&service, owner, "Docs", "Dev").await;

    service.delete_category(owner, "Work").await.unwrap();

    let bookmarks = all_bookmarks(&service, owner).await;
    assert_eq!(bookmarks.len(), 2);
    assert_eq!(bookmarks[0].category, "");
    assert_eq!(bookmarks[1].category, "Dev");
    assert!(store.find_category(owner, "Work").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_failure_during_add_writes_nothing() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    faulty.fail("bookmark_exists_name");
    let service = BookmarkService::new(faulty.clone());

    let result = service
        .add_bookmark(owner, &BookmarkDraft::new("Rust", "https://www.rust-lang.org", ""))
        .await;

    assert!(result.is_err());
    assert_eq!(faulty.calls("insert_bookmark"), 0);
    assert!(inner.positions(owner).await.unwrap().is_empty());
}
