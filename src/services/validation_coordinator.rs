//! Validation fan-out for bookmark add and edit.
//!
//! The independent checks (category resolution, name uniqueness, url
//! uniqueness and, on edit, the stored record) run as separate tokio tasks and
//! are joined before anything is decided. The first failing branch ends the
//! join with its error. The remaining tasks are detached rather than aborted,
//! so a category insert that is already in flight still completes; it is not
//! rolled back.
//!
//! Once every check has answered, [`decide`] picks the single outcome using a
//! fixed rule order.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::database::BookmarkStore;
use crate::managers::category_manager::CategoryManager;
use crate::managers::uniqueness_checker::UniquenessChecker;
use crate::types::bookmark::{Bookmark, BookmarkDraft, BookmarkId, UniqueField};
use crate::types::category::ResolvedCategory;
use crate::types::errors::{BookmarkError, StoreError};
use crate::types::outcome::{Outcome, RejectionCode, Verdict};
use crate::types::user::UserId;

/// Answers gathered by the fan-out, before any rule is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResults {
    pub category: ResolvedCategory,
    pub name_taken: bool,
    pub url_taken: bool,
    /// The stored record, present only when editing.
    pub current: Option<Bookmark>,
}

#[derive(Clone)]
pub struct ValidationCoordinator {
    store: Arc<dyn BookmarkStore>,
    categories: CategoryManager,
    checker: UniquenessChecker,
}

impl ValidationCoordinator {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            categories: CategoryManager::new(Arc::clone(&store)),
            checker: UniquenessChecker::new(Arc::clone(&store)),
            store,
        }
    }

    /// Validates `draft` for `owner`. `editing` is the bookmark being edited,
    /// `None` for an add.
    ///
    /// # Errors
    ///
    /// Any store failure in any branch, a panicked branch, or (on edit) a
    /// bookmark that does not exist for this owner.
    pub async fn validate(
        &self,
        owner: UserId,
        draft: &BookmarkDraft,
        editing: Option<BookmarkId>,
    ) -> Result<Verdict, BookmarkError> {
        let checks = self.run_checks(owner, draft, editing).await?;
        Ok(decide(draft, &checks))
    }

    /// Fans out the checks and waits for all of them.
    pub async fn run_checks(
        &self,
        owner: UserId,
        draft: &BookmarkDraft,
        editing: Option<BookmarkId>,
    ) -> Result<CheckResults, BookmarkError> {
        let category_task = {
            let categories = self.categories.clone();
            let name = draft.category.clone();
            tokio::spawn(async move { categories.resolve(&name, owner).await })
        };
        let name_task = self.spawn_exists(UniqueField::Name, draft.name.clone(), owner, editing);
        let url_task = self.spawn_exists(UniqueField::Url, draft.url.clone(), owner, editing);
        let current_task = editing.map(|id| {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move { store.get_bookmark(owner, id).await })
        });

        let (category, name_taken, url_taken, current) = tokio::try_join!(
            joined(category_task),
            joined(name_task),
            joined(url_task),
            async {
                match current_task {
                    Some(task) => joined(task).await.map(Some),
                    None => Ok(None),
                }
            },
        )?;

        let current = match (editing, current) {
            (Some(id), Some(None)) => return Err(BookmarkError::NotFound(id)),
            (_, current) => current.flatten(),
        };

        Ok(CheckResults {
            category,
            name_taken,
            url_taken,
            current,
        })
    }

    fn spawn_exists(
        &self,
        field: UniqueField,
        value: String,
        owner: UserId,
        exclude: Option<BookmarkId>,
    ) -> JoinHandle<Result<bool, StoreError>> {
        let checker = self.checker.clone();
        tokio::spawn(async move { checker.exists(field, &value, owner, exclude).await })
    }
}

/// Awaits one branch, folding a panicked or cancelled task into a system error.
async fn joined<T>(task: JoinHandle<Result<T, StoreError>>) -> Result<T, BookmarkError> {
    match task.await {
        Ok(result) => result.map_err(BookmarkError::from),
        Err(join_error) => Err(BookmarkError::TaskFailed(join_error.to_string())),
    }
}

/// Maps gathered check results to one verdict. The first matching rule wins:
///
/// 1. empty name
/// 2. (edit) nothing changed
/// 3. name taken
/// 4. url taken
/// 5. category too long
/// 6. category reserved
/// 7. proceed
pub fn decide(draft: &BookmarkDraft, checks: &CheckResults) -> Verdict {
    if draft.name.is_empty() {
        return Verdict::Conclude(Outcome::rejected(
            RejectionCode::Name,
            "Bookmark name is empty.",
        ));
    }
    if let Some(current) = &checks.current {
        if draft.matches(current) {
            return Verdict::Conclude(Outcome::Unchanged(
                "New bookmark is same as old bookmark.".to_string(),
            ));
        }
    }
    if checks.name_taken {
        return Verdict::Conclude(Outcome::rejected(
            RejectionCode::Name,
            format!("Bookmark name {} is already existed.", draft.name),
        ));
    }
    if checks.url_taken {
        return Verdict::Conclude(Outcome::rejected(
            RejectionCode::Url,
            format!("Bookmark url {} is already existed.", draft.url),
        ));
    }
    match checks.category {
        ResolvedCategory::TooLong => Verdict::Conclude(Outcome::rejected(
            RejectionCode::Category,
            "Category name exceeded length limit.",
        )),
        ResolvedCategory::Reserved => Verdict::Conclude(Outcome::rejected(
            RejectionCode::Category,
            format!("Category name {} is not allowed.", draft.category.trim()),
        )),
        resolved => Verdict::Proceed {
            category: resolved.id(),
        },
    }
}
