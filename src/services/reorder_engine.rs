//! Sequence reorder engine.
//!
//! Moves one bookmark to another position in the owner's list by shifting the
//! block between the two positions one step and then dropping the mover into
//! the freed slot. Positions of every bookmark outside that block stay put.

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::types::bookmark::{BookmarkId, SeqRange};
use crate::types::errors::{BookmarkError, StoreError};
use crate::types::user::UserId;

/// Which way the mover travels and how the block in between has to shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Target and source share a position.
    None,
    /// The mover goes towards the front; positions in `range` get +1.
    Earlier { range: SeqRange },
    /// The mover goes towards the back; positions in `range` get -1.
    Later { range: SeqRange },
}

impl Shift {
    /// Works out the block to shift for a move from `from` to `to`.
    pub fn plan(from: i64, to: i64) -> Self {
        if from == to {
            Shift::None
        } else if from > to {
            Shift::Earlier {
                range: SeqRange::new(to, from - 1),
            }
        } else {
            Shift::Later {
                range: SeqRange::new(from + 1, to),
            }
        }
    }
}

#[derive(Clone)]
pub struct ReorderEngine {
    store: Arc<dyn BookmarkStore>,
}

impl ReorderEngine {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Moves `moving` to the position currently held by `target`.
    ///
    /// Both positions are read concurrently. If either bookmark is missing the
    /// call fails with [`BookmarkError::NotFound`] before anything is written.
    /// If the block shift succeeds but placing the mover fails, the sequence
    /// holds a duplicate and the error is a [`BookmarkError::ConsistencyHazard`].
    pub async fn reorder(
        &self,
        owner: UserId,
        moving: BookmarkId,
        target: BookmarkId,
    ) -> Result<(), BookmarkError> {
        let (from, to) = tokio::try_join!(
            self.position_of(owner, moving),
            self.position_of(owner, target),
        )?;

        let (range, delta) = match Shift::plan(from, to) {
            Shift::None => {
                tracing::debug!(owner, moving, target, "reorder onto same position ignored");
                return Ok(());
            }
            Shift::Earlier { range } => (range, 1),
            Shift::Later { range } => (range, -1),
        };

        let shifted = self.store.shift_positions(owner, range, delta).await?;

        match self.store.set_position(owner, moving, to).await {
            Ok(1) => {}
            // deleted between the position read and the placement
            Ok(_) => return Err(self.hazard(owner, moving, from, to, shifted, None)),
            Err(source) => return Err(self.hazard(owner, moving, from, to, shifted, Some(source))),
        }

        tracing::debug!(owner, moving, from, to, shifted, "bookmark reordered");
        Ok(())
    }

    async fn position_of(&self, owner: UserId, id: BookmarkId) -> Result<i64, BookmarkError> {
        self.store
            .position(owner, id)
            .await?
            .ok_or(BookmarkError::NotFound(id))
    }

    fn hazard(
        &self,
        owner: UserId,
        moving: BookmarkId,
        from: i64,
        to: i64,
        shifted: u64,
        source: Option<StoreError>,
    ) -> BookmarkError {
        match &source {
            Some(err) => tracing::error!(
                owner,
                moving,
                from,
                to,
                shifted,
                reconcile = true,
                error = %err,
                "reorder left sequence inconsistent"
            ),
            None => tracing::error!(
                owner,
                moving,
                from,
                to,
                shifted,
                reconcile = true,
                "reorder left sequence inconsistent: mover no longer exists"
            ),
        }
        BookmarkError::ConsistencyHazard {
            owner,
            detail: format!(
                "shifted {} bookmarks for a move of {} from {} to {} but could not place it",
                shifted, moving, from, to
            ),
            source,
        }
    }
}
