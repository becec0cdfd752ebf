//! Tests for the ordered-list reposition engine.

use std::collections::BTreeSet;
use std::time::Duration;

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use gamelist::{CatalogRepository, ListService, MoveError, NewGame, NewGameList};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn setup_test_db() -> (NamedTempFile, CatalogRepository, ListService) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = CatalogRepository::new(db_path);
    let service = ListService::new(repo.clone());
    (db_file, repo, service)
}

fn sample_game(title: &str) -> NewGame {
    NewGame::new(
        title.to_string(),
        2017,
        "Platformer".to_string(),
        "PC".to_string(),
        4.5,
        format!("https://example.com/covers/{title}.png"),
        format!("{title} in short"),
        format!("{title} at length"),
    )
}

/// Creates a list whose games are titled by `titles`, at dense positions
/// matching the slice order. Returns the list id.
fn seed_list(repo: &CatalogRepository, titles: &[&str]) -> i64 {
    let list = repo
        .create_list(NewGameList::new("Favorites".to_string()))
        .expect("Create list failed");
    for (position, title) in titles.iter().enumerate() {
        let game = repo.create_game(sample_game(title)).expect("Create game failed");
        repo.add_game_to_list(*list.id(), *game.id(), position as i32)
            .expect("Add failed");
    }
    *list.id()
}

fn titles_in_order(repo: &CatalogRepository, list_id: i64) -> Vec<String> {
    repo.list_entries(list_id)
        .expect("Query failed")
        .iter()
        .map(|e| e.title().clone())
        .collect()
}

fn positions(repo: &CatalogRepository, list_id: i64) -> Vec<i32> {
    repo.list_entries(list_id)
        .expect("Query failed")
        .iter()
        .map(|e| *e.position())
        .collect()
}

#[tokio::test]
async fn test_move_forward_reorders() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 1, 3).await.expect("Move failed");

    assert_eq!(titles_in_order(&repo, list_id), ["A", "C", "D", "B", "E"]);
    assert_eq!(positions(&repo, list_id), [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_move_backward_reorders() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 3, 1).await.expect("Move failed");

    assert_eq!(titles_in_order(&repo, list_id), ["A", "D", "B", "C", "E"]);
    assert_eq!(positions(&repo, list_id), [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_move_to_front_rewrites_full_range() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 4, 0).await.expect("Move failed");

    assert_eq!(titles_in_order(&repo, list_id), ["E", "A", "B", "C", "D"]);
    assert_eq!(positions(&repo, list_id), [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_positions_stay_dense_across_moves() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 0, 4).await.expect("Move failed");
    service.move_game(list_id, 2, 1).await.expect("Move failed");
    service.move_game(list_id, 3, 3).await.expect("Move failed");

    let positions: BTreeSet<i32> = repo
        .list_entries(list_id)
        .expect("Query failed")
        .iter()
        .map(|e| *e.position())
        .collect();
    assert_eq!(positions, BTreeSet::from([0, 1, 2, 3, 4]));
}

#[tokio::test]
async fn test_move_writes_only_affected_range() {
    // Seed sparse, non-canonical positions: rows outside the move range keep
    // their stored values, which makes any extra write observable.
    let (_db, repo, service) = setup_test_db();
    let list = repo
        .create_list(NewGameList::new("Favorites".to_string()))
        .expect("Create list failed");
    let list_id = *list.id();
    for (i, title) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let game = repo.create_game(sample_game(title)).expect("Create game failed");
        repo.add_game_to_list(list_id, *game.id(), (i as i32 + 1) * 10)
            .expect("Add failed");
    }

    service.move_game(list_id, 1, 3).await.expect("Move failed");

    let entries = repo.list_entries(list_id).expect("Query failed");
    let position_of = |title: &str| {
        *entries
            .iter()
            .find(|e| e.title() == title)
            .expect("missing entry")
            .position()
    };
    // Slots 1..=3 of the new ordering were rewritten to their indices
    assert_eq!(position_of("C"), 1);
    assert_eq!(position_of("D"), 2);
    assert_eq!(position_of("B"), 3);
    // A and E sit outside the range and were never written
    assert_eq!(position_of("A"), 10);
    assert_eq!(position_of("E"), 50);
}

#[tokio::test]
async fn test_move_same_index_succeeds_unchanged() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 2, 2).await.expect("Move failed");

    assert_eq!(titles_in_order(&repo, list_id), ["A", "B", "C", "D", "E"]);
    assert_eq!(positions(&repo, list_id), [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_move_same_index_writes_single_slot() {
    // Same sparse-seeding trick: only the degenerate one-slot range gets
    // canonicalized, every other row keeps its stored value.
    let (_db, repo, service) = setup_test_db();
    let list = repo
        .create_list(NewGameList::new("Favorites".to_string()))
        .expect("Create list failed");
    let list_id = *list.id();
    for (i, title) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let game = repo.create_game(sample_game(title)).expect("Create game failed");
        repo.add_game_to_list(list_id, *game.id(), (i as i32 + 1) * 10)
            .expect("Add failed");
    }

    service.move_game(list_id, 2, 2).await.expect("Move failed");

    let entries = repo.list_entries(list_id).expect("Query failed");
    let position_of = |title: &str| {
        *entries
            .iter()
            .find(|e| e.title() == title)
            .expect("missing entry")
            .position()
    };
    assert_eq!(position_of("C"), 2);
    assert_eq!(position_of("A"), 10);
    assert_eq!(position_of("B"), 20);
    assert_eq!(position_of("D"), 40);
    assert_eq!(position_of("E"), 50);
}

#[tokio::test]
async fn test_inverse_move_restores_order() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    service.move_game(list_id, 1, 3).await.expect("Move failed");
    service.move_game(list_id, 3, 1).await.expect("Move failed");

    assert_eq!(titles_in_order(&repo, list_id), ["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn test_relative_order_preserved_outside_range() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E", "F", "G"]);

    service.move_game(list_id, 2, 4).await.expect("Move failed");

    let titles = titles_in_order(&repo, list_id);
    assert_eq!(titles, ["A", "B", "D", "E", "C", "F", "G"]);
    // Everything outside 2..=4 is untouched in both position and order
    assert_eq!(titles[0], "A");
    assert_eq!(titles[1], "B");
    assert_eq!(titles[5], "F");
    assert_eq!(titles[6], "G");
}

#[tokio::test]
async fn test_move_source_out_of_bounds_rejected() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C"]);

    let result = service.move_game(list_id, 3, 0).await;
    assert!(matches!(result, Err(MoveError::InvalidArgument { .. })));
    assert_eq!(titles_in_order(&repo, list_id), ["A", "B", "C"]);
}

#[tokio::test]
async fn test_move_destination_out_of_bounds_rejected() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C"]);

    let result = service.move_game(list_id, 0, 3).await;
    assert!(matches!(result, Err(MoveError::InvalidArgument { .. })));
    assert_eq!(titles_in_order(&repo, list_id), ["A", "B", "C"]);
}

#[tokio::test]
async fn test_move_on_empty_list_not_found() {
    let (_db, repo, service) = setup_test_db();
    let list = repo
        .create_list(NewGameList::new("Empty".to_string()))
        .expect("Create list failed");

    let result = service.move_game(*list.id(), 0, 0).await;
    assert!(matches!(result, Err(MoveError::NotFound { .. })));
}

#[tokio::test]
async fn test_move_on_unknown_list_not_found() {
    let (_db, _repo, service) = setup_test_db();

    let result = service.move_game(999, 0, 0).await;
    assert!(matches!(result, Err(MoveError::NotFound { list_id: 999 })));
}

#[tokio::test]
async fn test_move_rejects_non_positive_list_id() {
    let (_db, _repo, service) = setup_test_db();

    assert!(matches!(
        service.move_game(0, 0, 0).await,
        Err(MoveError::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.move_game(-5, 0, 0).await,
        Err(MoveError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_move_rejects_negative_indices() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C"]);

    assert!(matches!(
        service.move_game(list_id, -1, 2).await,
        Err(MoveError::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.move_game(list_id, 0, -2).await,
        Err(MoveError::InvalidArgument { .. })
    ));
    assert_eq!(titles_in_order(&repo, list_id), ["A", "B", "C"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_moves_on_different_lists_do_not_block() {
    let (_db, repo, service) = setup_test_db();

    // A deliberately large list makes the background move's fetch, reorder,
    // and full-range flush take a while.
    let big_titles: Vec<String> = (0..200).map(|i| format!("Big {i:03}")).collect();
    let big_refs: Vec<&str> = big_titles.iter().map(String::as_str).collect();
    let big_list = seed_list(&repo, &big_refs);
    let small_list = seed_list(&repo, &["A", "B", "C"]);

    let background = {
        let service = service.clone();
        tokio::spawn(async move { service.move_game(big_list, 0, 199).await })
    };

    // The small list's move must complete while the big move is in flight,
    // not wait for it.
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.move_game(small_list, 0, 2),
    )
    .await;
    result
        .expect("Move on an unrelated list should not wait for the in-flight move")
        .expect("Move failed");

    background
        .await
        .expect("Join failed")
        .expect("Background move failed");

    assert_eq!(titles_in_order(&repo, small_list), ["B", "C", "A"]);
    let big_positions: BTreeSet<i32> = repo
        .list_entries(big_list)
        .expect("Query failed")
        .iter()
        .map(|e| *e.position())
        .collect();
    assert_eq!(big_positions, (0..200).collect::<BTreeSet<i32>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_on_same_list_keep_positions_dense() {
    let (_db, repo, service) = setup_test_db();
    let list_id = seed_list(&repo, &["A", "B", "C", "D", "E"]);

    let mut handles = Vec::new();
    for (source, destination) in [(0, 4), (1, 3), (4, 0), (2, 2), (3, 1)] {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.move_game(list_id, source, destination).await
        }));
    }
    for handle in handles {
        handle.await.expect("Join failed").expect("Move failed");
    }

    let positions: BTreeSet<i32> = repo
        .list_entries(list_id)
        .expect("Query failed")
        .iter()
        .map(|e| *e.position())
        .collect();
    assert_eq!(positions, BTreeSet::from([0, 1, 2, 3, 4]));
}
