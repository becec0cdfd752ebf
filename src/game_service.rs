//! Game read operations over the catalog repository.

use tracing::{debug, instrument};

use crate::db::{CatalogRepository, Game, GameSummary, ListEntry, StoreError};

/// Service layer for game reads.
#[derive(Debug, Clone)]
pub struct GameService {
    repository: CatalogRepository,
}

impl GameService {
    /// Creates a new game service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: CatalogRepository) -> Self {
        Self { repository }
    }

    /// Returns all games in the catalog as minimal projections.
    #[instrument(skip(self))]
    pub fn find_all(&self) -> Result<Vec<GameSummary>, StoreError> {
        debug!("Listing games");
        self.repository.list_games()
    }

    /// Returns a game with full detail, or `None` if the id is unknown.
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: i64) -> Result<Option<Game>, StoreError> {
        debug!(game_id = %id, "Looking up game");
        self.repository.find_game(id)
    }

    /// Returns the games of a list in display order. An unknown or empty
    /// list yields an empty vector.
    #[instrument(skip(self))]
    pub fn find_by_list(&self, list_id: i64) -> Result<Vec<ListEntry>, StoreError> {
        debug!(list_id = %list_id, "Listing games of list");
        self.repository.list_entries(list_id)
    }
}
