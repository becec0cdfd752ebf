//! Gamelist - game catalog server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use gamelist::{AppState, CatalogRepository, NewGame, NewGameList, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => run_server(host, port, db_path).await,
        Command::Seed { db_path } => run_seed(db_path),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// DATABASE_URL takes precedence over the CLI path when set.
fn resolve_db_path(db_path: String) -> String {
    std::env::var("DATABASE_URL").unwrap_or(db_path)
}

fn run_migrations(db_path: &str) -> Result<()> {
    let mut conn = SqliteConnection::establish(db_path)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "Applied pending migrations");
    }
    Ok(())
}

/// Run the HTTP catalog server
async fn run_server(host: String, port: u16, db_path: String) -> Result<()> {
    init_tracing();

    let db_path = resolve_db_path(db_path);
    info!(db_path = %db_path, "Starting gamelist server");
    run_migrations(&db_path)?;

    let state = AppState::new(CatalogRepository::new(db_path));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(port, "Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Populate the database with the sample catalog
fn run_seed(db_path: String) -> Result<()> {
    init_tracing();

    let db_path = resolve_db_path(db_path);
    info!(db_path = %db_path, "Seeding sample catalog");
    run_migrations(&db_path)?;

    let repository = CatalogRepository::new(db_path);

    if !repository.list_games()?.is_empty() {
        info!("Catalog already has games, skipping seed");
        return Ok(());
    }

    const SHORT_DESCRIPTION: &str =
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
    const LONG_DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing \
        elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim \
        ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea \
        commodo consequat.";

    let catalog = [
        ("Mass Effect Trilogy", 2012, "Role-playing (RPG), Shooter", "XBox, Playstation, PC", 4.8),
        ("Red Dead Redemption 2", 2018, "Action, Adventure", "XBox, Playstation, PC", 4.7),
        ("The Witcher 3: Wild Hunt", 2014, "Role-playing (RPG), Adventure", "XBox, Playstation, PC", 4.7),
        ("Sekiro: Shadows Die Twice", 2019, "Action, Adventure", "XBox, Playstation, PC", 3.8),
        ("Ghost of Tsushima", 2020, "Action, Adventure", "Playstation", 4.6),
        ("Super Mario World", 1990, "Platformer", "Super Nintendo, PC", 4.7),
        ("Hollow Knight", 2017, "Platformer, Metroidvania", "XBox, Playstation, PC, Switch", 4.6),
        ("Ori and the Blind Forest", 2015, "Platformer, Metroidvania", "XBox, PC, Switch", 4.0),
        ("Cuphead", 2017, "Platformer, Run-and-gun", "XBox, Playstation, PC, Switch", 4.6),
        ("Sonic CD", 1993, "Platformer", "Sega CD, PC", 4.0),
    ];

    let mut game_ids = Vec::with_capacity(catalog.len());
    for (i, (title, year, genre, platforms, score)) in catalog.iter().enumerate() {
        let game = repository.create_game(NewGame::new(
            (*title).to_string(),
            *year,
            (*genre).to_string(),
            (*platforms).to_string(),
            *score,
            format!("https://example.com/covers/{}.png", i + 1),
            SHORT_DESCRIPTION.to_string(),
            LONG_DESCRIPTION.to_string(),
        ))?;
        game_ids.push(*game.id());
    }

    let adventure = repository.create_list(NewGameList::new("Adventure and RPG".to_string()))?;
    let platformers = repository.create_list(NewGameList::new("Platform games".to_string()))?;

    for (position, game_id) in game_ids[..5].iter().enumerate() {
        repository.add_game_to_list(*adventure.id(), *game_id, position as i32)?;
    }
    for (position, game_id) in game_ids[5..].iter().enumerate() {
        repository.add_game_to_list(*platformers.id(), *game_id, position as i32)?;
    }

    info!(
        games = game_ids.len(),
        lists = 2,
        "Sample catalog seeded"
    );
    Ok(())
}
