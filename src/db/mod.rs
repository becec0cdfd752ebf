//! Database persistence layer for the game catalog.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::StoreError;
pub use models::{Game, GameList, GameSummary, ListEntry, ListGame, NewGame, NewGameList};
pub use repository::CatalogRepository;
