//! HTTP surface over the catalog services.
//!
//! Thin request/response plumbing: handlers validate path input, call the
//! service layer, and map typed results onto status codes. Storage failures
//! are logged and surfaced as bare 500 responses without internal detail.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use crate::db::{CatalogRepository, Game, GameList, GameSummary, ListEntry};
use crate::game_service::GameService;
use crate::list_service::{ListService, MoveError};

/// Shared application state: the two services over one repository.
#[derive(Debug, Clone)]
pub struct AppState {
    games: GameService,
    lists: ListService,
}

impl AppState {
    /// Creates the application state from a catalog repository.
    #[instrument(skip(repository))]
    pub fn new(repository: CatalogRepository) -> Self {
        Self {
            games: GameService::new(repository.clone()),
            lists: ListService::new(repository),
        }
    }
}

/// Builds the catalog router with all routes registered.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/{id}", get(find_game))
        .route("/lists", get(list_game_lists))
        .route("/lists/{list_id}/games", get(games_in_list))
        .route("/lists/{list_id}/replacement", post(move_game))
        .with_state(state)
}

/// Minimal game representation for catalog listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameSummaryDto {
    id: i64,
    title: String,
    year: i32,
    img_url: String,
    short_description: String,
}

impl From<&GameSummary> for GameSummaryDto {
    fn from(game: &GameSummary) -> Self {
        Self {
            id: *game.id(),
            title: game.title().clone(),
            year: *game.release_year(),
            img_url: game.img_url().clone(),
            short_description: game.short_description().clone(),
        }
    }
}

/// Full game representation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameDto {
    id: i64,
    title: String,
    year: i32,
    genre: String,
    platforms: String,
    score: f64,
    img_url: String,
    short_description: String,
    long_description: String,
}

impl From<&Game> for GameDto {
    fn from(game: &Game) -> Self {
        Self {
            id: *game.id(),
            title: game.title().clone(),
            year: *game.release_year(),
            genre: game.genre().clone(),
            platforms: game.platforms().clone(),
            score: *game.score(),
            img_url: game.img_url().clone(),
            short_description: game.short_description().clone(),
            long_description: game.long_description().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameListDto {
    id: i64,
    name: String,
}

impl From<&GameList> for GameListDto {
    fn from(list: &GameList) -> Self {
        Self {
            id: *list.id(),
            name: list.name().clone(),
        }
    }
}

impl From<&ListEntry> for GameSummaryDto {
    fn from(entry: &ListEntry) -> Self {
        Self {
            id: *entry.game_id(),
            title: entry.title().clone(),
            year: *entry.release_year(),
            img_url: entry.img_url().clone(),
            short_description: entry.short_description().clone(),
        }
    }
}

/// Reposition request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplacementDto {
    source_index: i32,
    destination_index: i32,
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Response {
    match state.games.find_all() {
        Ok(games) if games.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(games) => Json(games.iter().map(GameSummaryDto::from).collect::<Vec<_>>()).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list games");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[instrument(skip(state))]
async fn find_game(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    if id <= 0 {
        warn!(game_id = %id, "Rejecting non-positive game id");
        return StatusCode::BAD_REQUEST.into_response();
    }
    match state.games.find_by_id(id) {
        Ok(Some(game)) => Json(GameDto::from(&game)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(error = %e, game_id = %id, "Failed to look up game");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[instrument(skip(state))]
async fn list_game_lists(State(state): State<AppState>) -> Response {
    match state.lists.find_all() {
        Ok(lists) if lists.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(lists) => Json(lists.iter().map(GameListDto::from).collect::<Vec<_>>()).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list game lists");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[instrument(skip(state))]
async fn games_in_list(State(state): State<AppState>, Path(list_id): Path<i64>) -> Response {
    if list_id <= 0 {
        warn!(list_id = %list_id, "Rejecting non-positive list id");
        return StatusCode::BAD_REQUEST.into_response();
    }
    match state.games.find_by_list(list_id) {
        Ok(entries) if entries.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(entries) => {
            Json(entries.iter().map(GameSummaryDto::from).collect::<Vec<_>>()).into_response()
        }
        Err(e) => {
            error!(error = %e, list_id = %list_id, "Failed to list games of list");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[instrument(skip(state, body), fields(source = body.source_index, destination = body.destination_index))]
async fn move_game(
    State(state): State<AppState>,
    Path(list_id): Path<i64>,
    Json(body): Json<ReplacementDto>,
) -> Response {
    match state
        .lists
        .move_game(list_id, body.source_index, body.destination_index)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(MoveError::InvalidArgument { message }) => {
            warn!(list_id = %list_id, message = %message, "Rejecting move request");
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(MoveError::NotFound { .. }) => StatusCode::NOT_FOUND.into_response(),
        Err(MoveError::Storage { source }) => {
            error!(error = %source, list_id = %list_id, "Move failed in storage");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
