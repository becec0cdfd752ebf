//! Database models for the game catalog.

use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// Full game row as stored in the catalog.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct Game {
    id: i64,
    title: String,
    release_year: i32,
    genre: String,
    platforms: String,
    score: f64,
    img_url: String,
    short_description: String,
    long_description: String,
}

/// Insertable game model for populating the catalog.
#[derive(Debug, Clone, Insertable, Getters, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    title: String,
    release_year: i32,
    genre: String,
    platforms: String,
    score: f64,
    img_url: String,
    short_description: String,
    long_description: String,
}

/// Minimal game projection for catalog listings.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameSummary {
    id: i64,
    title: String,
    release_year: i32,
    img_url: String,
    short_description: String,
}

/// Named, ordered list of games.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_lists)]
pub struct GameList {
    id: i64,
    name: String,
}

/// Insertable list model.
#[derive(Debug, Clone, Insertable, Getters, new)]
#[diesel(table_name = schema::game_lists)]
pub struct NewGameList {
    name: String,
}

/// Membership row binding one game to one list at an ordinal position.
///
/// Positions within a list are dense (`0..N-1`); the reposition engine is
/// the only writer that mutates them, and it never inserts or deletes rows.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Insertable, Getters, new)]
#[diesel(table_name = schema::list_games)]
#[diesel(primary_key(list_id, game_id))]
#[diesel(belongs_to(GameList, foreign_key = list_id))]
#[diesel(belongs_to(Game, foreign_key = game_id))]
pub struct ListGame {
    list_id: i64,
    game_id: i64,
    position: i32,
}

/// Game projection joined with its position inside one list, as returned by
/// the ordered membership fetch.
#[derive(Debug, Clone, Queryable, Getters)]
pub struct ListEntry {
    game_id: i64,
    title: String,
    release_year: i32,
    img_url: String,
    short_description: String,
    position: i32,
}
