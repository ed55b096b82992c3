//! Integration tests for category resolution.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use common::{memory_store, new_owner, FaultyStore};
use mybookmarks::database::BookmarkStore;
use mybookmarks::managers::category_manager::CategoryManager;
use mybookmarks::types::category::ResolvedCategory;

#[rstest]
#[case::blank("", ResolvedCategory::None)]
#[case::whitespace("   ", ResolvedCategory::None)]
#[case::too_long("a very long category", ResolvedCategory::TooLong)]
#[case::reserved_all("All Bookmarks", ResolvedCategory::Reserved)]
#[case::reserved_padded("  Uncategorized ", ResolvedCategory::Reserved)]
#[tokio::test]
async fn test_sentinels_never_touch_the_store(#[case] name: &str, #[case] expected: ResolvedCategory) {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let faulty = Arc::new(FaultyStore::new(inner));
    let manager = CategoryManager::new(faulty.clone());

    assert_eq!(manager.resolve(name, owner).await.unwrap(), expected);
    assert_eq!(faulty.calls("find_category"), 0);
    assert_eq!(faulty.calls("insert_category"), 0);
}

#[tokio::test]
async fn test_resolve_creates_once_then_reuses() {
    let store: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(store.as_ref(), "alice").await;
    let manager = CategoryManager::new(Arc::clone(&store));

    let first = manager.resolve(" Work ", owner).await.unwrap();
    let second = manager.resolve("Work", owner).await.unwrap();

    assert!(matches!(first, ResolvedCategory::Existing(_)));
    assert_eq!(first, second);
    assert_eq!(store.find_category(owner, "Work").await.unwrap(), first.id());
}

#[tokio::test]
async fn test_fifteen_characters_is_within_limit() {
    let store: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(store.as_ref(), "alice").await;
    let manager = CategoryManager::new(Arc::clone(&store));

    let resolved = manager.resolve("fifteen chars!!", owner).await.unwrap();

    assert!(matches!(resolved, ResolvedCategory::Existing(_)));
}

#[tokio::test]
async fn test_categories_are_per_owner() {
    let store: Arc<dyn BookmarkStore> = memory_store();
    let alice = new_owner(store.as_ref(), "alice").await;
    let bob = new_owner(store.as_ref(), "bob").await;
    let manager = CategoryManager::new(Arc::clone(&store));

    let for_alice = manager.resolve("Work", alice).await.unwrap();
    let for_bob = manager.resolve("Work", bob).await.unwrap();

    assert_ne!(for_alice, for_bob);
}

#[tokio::test]
async fn test_concurrent_creation_has_one_loser() {
    let inner: Arc<dyn BookmarkStore> = memory_store();
    let owner = new_owner(inner.as_ref(), "alice").await;
    let faulty = Arc::new(FaultyStore::new(Arc::clone(&inner)));
    // both lookups finish before either insert runs
    faulty.delay("insert_category", Duration::from_millis(50));
    let manager = CategoryManager::new(faulty.clone());

    let (a, b) = tokio::join!(manager.resolve("Work", owner), manager.resolve("Work", owner));

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert!(inner.find_category(owner, "Work").await.unwrap().is_some());
}
