//! Game list reads and the ordered-list reposition engine.

use std::sync::Arc;

use dashmap::DashMap;
use derive_more::{Display, Error};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::db::{CatalogRepository, GameList, StoreError};

/// Failure modes of a reposition request.
///
/// `InvalidArgument` and `NotFound` are validated outcomes detected before
/// any write; `Storage` wraps an unexpected persistence failure after the
/// transaction has been rolled back.
#[derive(Debug, Clone, Display, Error)]
pub enum MoveError {
    /// Malformed or out-of-range input.
    #[display("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the request.
        message: String,
    },
    /// The list has no memberships (unknown list and empty list are not
    /// distinguished).
    #[display("No games found for list {list_id}")]
    NotFound {
        /// The list that was requested.
        list_id: i64,
    },
    /// The persistence layer failed while reading or writing.
    #[display("{source}")]
    Storage {
        /// Underlying storage failure.
        source: StoreError,
    },
}

impl From<StoreError> for MoveError {
    fn from(source: StoreError) -> Self {
        Self::Storage { source }
    }
}

impl From<diesel::result::Error> for MoveError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Storage {
            source: StoreError::from(err),
        }
    }
}

/// Service layer for game lists: reads plus the reposition engine.
///
/// Moves are serialized per list through a lock keyed by `list_id`, so
/// concurrent moves on the same list apply one after the other while moves
/// on unrelated lists proceed independently.
#[derive(Debug, Clone)]
pub struct ListService {
    repository: CatalogRepository,
    move_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl ListService {
    /// Creates a new list service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: CatalogRepository) -> Self {
        Self {
            repository,
            move_locks: Arc::new(DashMap::new()),
        }
    }

    /// Returns all game lists.
    #[instrument(skip(self))]
    pub fn find_all(&self) -> Result<Vec<GameList>, StoreError> {
        debug!("Listing game lists");
        self.repository.list_game_lists()
    }

    /// Moves the game at `source_index` to `destination_index` within the
    /// list, shifting every game strictly between them by one slot, and
    /// persists the new ordering with the minimal set of position writes.
    ///
    /// The fetch, bounds checks, and in-memory reorder run under the list's
    /// own lock, outside any database transaction, so moves on unrelated
    /// lists never contend for the single SQLite writer while one of them
    /// is still reading or computing. Only the flush of `min..=max` of the
    /// two indices runs inside an immediate transaction; it re-validates
    /// that the membership set still matches the snapshot before writing
    /// (outside collaborators may add or remove memberships) and rolls the
    /// whole write set back on any failure.
    ///
    /// # Errors
    ///
    /// - [`MoveError::InvalidArgument`] for a non-positive list id, a
    ///   negative index, or an index at or beyond the list's length.
    /// - [`MoveError::NotFound`] when the list has no memberships.
    /// - [`MoveError::Storage`] for any persistence failure or a membership
    ///   change detected between snapshot and flush; the transaction is
    ///   rolled back.
    #[instrument(skip(self))]
    pub async fn move_game(
        &self,
        list_id: i64,
        source_index: i32,
        destination_index: i32,
    ) -> Result<(), MoveError> {
        info!(
            list_id = %list_id,
            source_index,
            destination_index,
            "Repositioning game within list"
        );

        if list_id <= 0 {
            warn!(list_id = %list_id, "Rejecting non-positive list id");
            return Err(MoveError::InvalidArgument {
                message: format!("list id must be positive, got {}", list_id),
            });
        }
        if source_index < 0 || destination_index < 0 {
            warn!(source_index, destination_index, "Rejecting negative index");
            return Err(MoveError::InvalidArgument {
                message: format!(
                    "indices must be non-negative, got source {} and destination {}",
                    source_index, destination_index
                ),
            });
        }

        // One lock per list; the map guard is dropped before awaiting.
        let lock = self.move_locks.entry(list_id).or_default().clone();
        let _guard = lock.lock().await;

        let mut conn = self.repository.connection()?;
        let mut entries = CatalogRepository::list_entries_with(&mut conn, list_id)?;
        if entries.is_empty() {
            warn!(list_id = %list_id, "List has no games");
            return Err(MoveError::NotFound { list_id });
        }

        let len = entries.len();
        let source = source_index as usize;
        let destination = destination_index as usize;
        if source >= len || destination >= len {
            warn!(
                source_index,
                destination_index,
                len,
                "Rejecting index out of bounds"
            );
            return Err(MoveError::InvalidArgument {
                message: format!(
                    "index out of bounds for list of {} games: source {}, destination {}",
                    len, source_index, destination_index
                ),
            });
        }

        let snapshot_ids: Vec<i64> = entries.iter().map(|e| *e.game_id()).collect();

        // Single-element relocation: everything strictly between the two
        // indices shifts by one slot toward the vacated end.
        let moved = entries.remove(source);
        entries.insert(destination, moved);

        // Slots outside min..=max keep their stored positions; rewriting
        // them would be redundant.
        let lo = source.min(destination);
        let hi = source.max(destination);

        conn.immediate_transaction(|conn| {
            // The snapshot was read outside the write transaction. The lock
            // rules out a competing move, but membership rows are created
            // and deleted by collaborators outside the engine; bail out if
            // the set changed underneath us.
            let current_ids: Vec<i64> = CatalogRepository::list_entries_with(conn, list_id)?
                .iter()
                .map(|e| *e.game_id())
                .collect();
            if current_ids != snapshot_ids {
                warn!(list_id = %list_id, "Memberships changed between snapshot and flush");
                return Err(MoveError::Storage {
                    source: StoreError::new(format!(
                        "memberships of list {} changed during reposition",
                        list_id
                    )),
                });
            }

            for (i, entry) in entries.iter().enumerate().take(hi + 1).skip(lo) {
                CatalogRepository::set_position_with(conn, list_id, *entry.game_id(), i as i32)?;
            }

            info!(
                list_id = %list_id,
                writes = hi - lo + 1,
                "Reposition committed"
            );
            Ok(())
        })
    }
}
