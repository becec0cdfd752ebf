//! Game catalog service with ordered, repositionable game lists.
//!
//! # Architecture
//!
//! - **db**: diesel/SQLite persistence (repository, models, migrations)
//! - **Services**: [`GameService`] for catalog reads, [`ListService`] for
//!   list reads and the ordered-list reposition engine
//! - **Server**: axum router exposing the catalog over HTTP
//!
//! # Example
//!
//! ```no_run
//! use gamelist::{AppState, CatalogRepository, router};
//!
//! let repository = CatalogRepository::new("gamelist.db".to_string());
//! let app = router(AppState::new(repository));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod db;
mod game_service;
mod list_service;
mod server;

// Crate-level exports - Persistence layer
pub use db::{
    CatalogRepository, Game, GameList, GameSummary, ListEntry, ListGame, NewGame, NewGameList,
    StoreError,
};

// Crate-level exports - Services
pub use game_service::GameService;
pub use list_service::{ListService, MoveError};

// Crate-level exports - HTTP surface
pub use server::{AppState, router};
