//! Catalog repository: durable storage for games, lists, and memberships.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{Game, GameList, GameSummary, ListEntry, ListGame, NewGame, NewGameList, StoreError, schema};

/// Repository over the catalog database.
///
/// Plain reads open their own connection. The position primitives used by
/// the reposition engine also exist as `*_with` forms taking an open
/// connection, so a fetch-compute-flush sequence can run inside one
/// transaction.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db_path: String,
}

impl CatalogRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating CatalogRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened.
    #[instrument(skip(self))]
    pub fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("failed to connect to '{}': {}", self.db_path, e))
        })?;
        // Wait out brief writer-lock contention instead of failing with
        // SQLITE_BUSY; SQLite grants one writer at a time per database file.
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Lists all games in the catalog as minimal projections, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameSummary>, StoreError> {
        debug!("Listing all games");
        let mut conn = self.connection()?;

        let games = schema::games::table
            .order(schema::games::id.asc())
            .select(GameSummary::as_select())
            .load::<GameSummary>(&mut conn)?;

        info!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Gets a game by id with full detail. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub fn find_game(&self, id: i64) -> Result<Option<Game>, StoreError> {
        debug!(game_id = %id, "Looking up game");
        let mut conn = self.connection()?;

        let game = schema::games::table
            .find(id)
            .select(Game::as_select())
            .first::<Game>(&mut conn)
            .optional()?;

        if game.is_some() {
            debug!(game_id = %id, "Game found");
        } else {
            debug!(game_id = %id, "Game not found");
        }

        Ok(game)
    }

    /// Lists all game lists, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub fn list_game_lists(&self) -> Result<Vec<GameList>, StoreError> {
        debug!("Listing all game lists");
        let mut conn = self.connection()?;

        let lists = schema::game_lists::table
            .order(schema::game_lists::id.asc())
            .select(GameList::as_select())
            .load::<GameList>(&mut conn)?;

        info!(count = lists.len(), "Game lists loaded");
        Ok(lists)
    }

    /// Fetches the memberships of a list joined with their games, ordered
    /// ascending by position. An unknown or empty list yields an empty
    /// vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(self))]
    pub fn list_entries(&self, list_id: i64) -> Result<Vec<ListEntry>, StoreError> {
        let mut conn = self.connection()?;
        Self::list_entries_with(&mut conn, list_id)
    }

    /// Ordered membership fetch on an already-open connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    #[instrument(skip(conn))]
    pub fn list_entries_with(
        conn: &mut SqliteConnection,
        list_id: i64,
    ) -> Result<Vec<ListEntry>, StoreError> {
        debug!(list_id = %list_id, "Fetching ordered list entries");

        let entries = schema::list_games::table
            .inner_join(schema::games::table)
            .filter(schema::list_games::list_id.eq(list_id))
            .order(schema::list_games::position.asc())
            .select((
                schema::games::id,
                schema::games::title,
                schema::games::release_year,
                schema::games::img_url,
                schema::games::short_description,
                schema::list_games::position,
            ))
            .load::<ListEntry>(conn)?;

        info!(list_id = %list_id, count = entries.len(), "List entries loaded");
        Ok(entries)
    }

    /// Sets the position of the membership identified by `(list_id, game_id)`.
    ///
    /// A targeted single-row update; no other membership is touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if no such membership exists or the update fails.
    #[instrument(skip(self))]
    pub fn set_position(
        &self,
        list_id: i64,
        game_id: i64,
        new_position: i32,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        Self::set_position_with(&mut conn, list_id, game_id, new_position)
    }

    /// Position update on an already-open connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if no such membership exists or the update fails.
    #[instrument(skip(conn))]
    pub fn set_position_with(
        conn: &mut SqliteConnection,
        list_id: i64,
        game_id: i64,
        new_position: i32,
    ) -> Result<(), StoreError> {
        debug!(list_id = %list_id, game_id = %game_id, new_position, "Updating position");

        let affected = diesel::update(schema::list_games::table.find((list_id, game_id)))
            .set(schema::list_games::position.eq(new_position))
            .execute(conn)?;

        if affected == 0 {
            return Err(StoreError::new(format!(
                "no membership for game {} in list {}",
                game_id, list_id
            )));
        }

        debug!(list_id = %list_id, game_id = %game_id, new_position, "Position updated");
        Ok(())
    }

    /// Inserts a new game into the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the insert fails.
    #[instrument(skip(self, game), fields(title = %game.title()))]
    pub fn create_game(&self, game: NewGame) -> Result<Game, StoreError> {
        debug!("Creating game");
        let mut conn = self.connection()?;

        let game = diesel::insert_into(schema::games::table)
            .values(&game)
            .returning(Game::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = game.id(), title = %game.title(), "Game created");
        Ok(game)
    }

    /// Inserts a new game list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the insert fails.
    #[instrument(skip(self, list), fields(name = %list.name()))]
    pub fn create_list(&self, list: NewGameList) -> Result<GameList, StoreError> {
        debug!("Creating game list");
        let mut conn = self.connection()?;

        let list = diesel::insert_into(schema::game_lists::table)
            .values(&list)
            .returning(GameList::as_returning())
            .get_result(&mut conn)?;

        info!(list_id = list.id(), name = %list.name(), "Game list created");
        Ok(list)
    }

    /// Adds a game to a list at the given position.
    ///
    /// Membership creation happens outside the reposition engine; callers
    /// are responsible for keeping positions dense when seeding.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the membership already exists or the insert fails.
    #[instrument(skip(self))]
    pub fn add_game_to_list(
        &self,
        list_id: i64,
        game_id: i64,
        position: i32,
    ) -> Result<(), StoreError> {
        debug!(list_id = %list_id, game_id = %game_id, position, "Adding game to list");
        let mut conn = self.connection()?;

        diesel::insert_into(schema::list_games::table)
            .values(ListGame::new(list_id, game_id, position))
            .execute(&mut conn)?;

        info!(list_id = %list_id, game_id = %game_id, position, "Game added to list");
        Ok(())
    }
}
