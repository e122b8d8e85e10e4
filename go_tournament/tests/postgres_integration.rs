//! Integration tests for the PostgreSQL repositories.
//!
//! These need a running database and are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://postgres@localhost/go_tournament_test \
//!     cargo test -p go_tournament --test postgres_integration -- --ignored
//! ```
//!
//! Every test truncates the tables first, so they are serialized.

use chrono::NaiveDate;
use go_tournament::db::{
    Database, DatabaseConfig, ParticipationRepository, PlayerRepository, Repositories,
    TournamentRepository,
};
use go_tournament::tournament::NewTournament;
use go_tournament::{
    EntityKind, ErrorKind, Name, NewPlayer, Player, PlayerService, Rank, RegistryError, Ruleset,
    Tournament, TournamentDto, TournamentService,
};
use serial_test::serial;

/// Helper to connect, migrate and empty the test database
async fn setup_test_db() -> (Database, Repositories) {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/go_tournament_test".to_string());

    let config = DatabaseConfig {
        database_url,
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        idle_timeout_secs: 300,
        max_lifetime_secs: 1800,
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to migrate test database");

    sqlx::query("TRUNCATE tournament_participants, tournaments, players RESTART IDENTITY CASCADE")
        .execute(db.pool())
        .await
        .expect("Failed to truncate tables");

    let repos = db.repositories();
    (db, repos)
}

async fn add_player(repos: &Repositories, family: &str, given: &str) -> Player {
    repos
        .players
        .add(NewPlayer::new(Name::new(family, given, true)))
        .await
        .expect("Failed to add player")
}

async fn add_tournament(repos: &Repositories, organizer: &Player) -> Tournament {
    repos
        .tournaments
        .add(NewTournament {
            name: "Spring Open".to_string(),
            location: "NYC".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 17).unwrap(),
            ruleset: Ruleset::Aga,
            organizer_id: organizer.id,
        })
        .await
        .expect("Failed to add tournament")
}

async fn edge_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tournament_participants")
        .fetch_one(db.pool())
        .await
        .expect("Failed to count edges")
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_player_round_trip() {
    let (_db, repos) = setup_test_db().await;

    let created = repos
        .players
        .add(
            NewPlayer::new(Name::new("Lee", "Sedol", false))
                .with_email("sedol@example.com")
                .with_rank(Rank::Dan9),
        )
        .await
        .unwrap();
    let bare = add_player(&repos, "Smith", "John").await;

    let stored = repos.players.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.rank, Some(Rank::Dan9));

    let stored = repos.players.get_by_id(bare.id).await.unwrap().unwrap();
    assert_eq!(stored.email, None);
    assert_eq!(stored.rank, None);

    assert!(repos.players.get_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_tournament_dates_and_ruleset_round_trip() {
    let (_db, repos) = setup_test_db().await;
    let organizer = add_player(&repos, "Smith", "John").await;
    let created = add_tournament(&repos, &organizer).await;

    let stored = repos.tournaments.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(
        stored.start_date,
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    );
    assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
    assert_eq!(stored.ruleset, Ruleset::Aga);
    assert_eq!(stored.organizer, organizer);
    assert!(stored.participants.is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_unknown_organizer_is_rejected() {
    let (_db, repos) = setup_test_db().await;
    let ghost = NewPlayer::new(Name::new("Ghost", "Casper", true)).into_player(9999);

    let err = repos
        .tournaments
        .add(NewTournament {
            name: "Phantom Cup".to_string(),
            location: "Nowhere".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ruleset: Ruleset::Ing,
            organizer_id: ghost.id,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::OrganizerNotFound(9999)));
    assert!(repos.tournaments.get_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_edge_insert_is_idempotent() {
    let (db, repos) = setup_test_db().await;
    let player = add_player(&repos, "Smith", "John").await;
    let tournament = add_tournament(&repos, &player).await;

    assert!(
        repos
            .participation
            .add_participant(tournament.id, player.id)
            .await
            .unwrap()
    );
    assert!(
        !repos
            .participation
            .add_participant(tournament.id, player.id)
            .await
            .unwrap()
    );
    assert_eq!(edge_count(&db).await, 1);

    assert!(
        repos
            .participation
            .remove_participant(tournament.id, player.id)
            .await
            .unwrap()
    );
    assert!(
        !repos
            .participation
            .remove_participant(tournament.id, player.id)
            .await
            .unwrap()
    );
    assert_eq!(edge_count(&db).await, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_edge_to_missing_entity_is_not_found() {
    let (db, repos) = setup_test_db().await;
    let player = add_player(&repos, "Smith", "John").await;
    let tournament = add_tournament(&repos, &player).await;

    let err = repos
        .participation
        .add_participant(tournament.id, 9999)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Player,
            id: 9999
        }
    ));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repos
        .participation
        .add_participant(9999, player.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Tournament,
            id: 9999
        }
    ));

    assert_eq!(edge_count(&db).await, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_organizer_delete_is_restricted() {
    let (_db, repos) = setup_test_db().await;
    let organizer = add_player(&repos, "Smith", "John").await;
    add_tournament(&repos, &organizer).await;

    let err = repos.players.delete(organizer.id).await.unwrap_err();

    assert!(matches!(err, RegistryError::OrganizerInUse(id) if id == organizer.id));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(repos.players.get_by_id(organizer.id).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_participant_delete_cascades() {
    let (db, repos) = setup_test_db().await;
    let organizer = add_player(&repos, "Smith", "John").await;
    let player = add_player(&repos, "Cho", "Chikun").await;
    let tournament = add_tournament(&repos, &organizer).await;
    repos
        .participation
        .add_participant(tournament.id, player.id)
        .await
        .unwrap();

    repos.players.delete(player.id).await.unwrap();

    let stored = repos.tournaments.get_by_id(tournament.id).await.unwrap().unwrap();
    assert!(stored.participants.is_empty());
    assert_eq!(edge_count(&db).await, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_tournament_delete_cascades() {
    let (db, repos) = setup_test_db().await;
    let organizer = add_player(&repos, "Smith", "John").await;
    let tournament = add_tournament(&repos, &organizer).await;
    repos
        .participation
        .add_participant(tournament.id, organizer.id)
        .await
        .unwrap();

    repos.tournaments.delete(tournament.id).await.unwrap();

    assert!(repos.participation.tournaments_of(organizer.id).await.unwrap().is_empty());
    assert_eq!(edge_count(&db).await, 0);

    let err = repos.tournaments.delete(tournament.id).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Tournament,
            ..
        }
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
#[serial]
async fn test_services_over_postgres() {
    let (_db, repos) = setup_test_db().await;
    let players = PlayerService::from_repositories(&repos);
    let tournaments = TournamentService::from_repositories(&repos);

    let player = players
        .register_player(NewPlayer::new(Name::new("Smith", "John", true)))
        .await
        .unwrap();
    let tournament = tournaments
        .add_tournament(TournamentDto {
            name: "Spring Open".to_string(),
            location: "NYC".to_string(),
            start_date: "2026-03-15".to_string(),
            end_date: "2026-03-17".to_string(),
            ruleset: Ruleset::Aga,
            organizer_id: player.id,
        })
        .await
        .unwrap();

    tournaments
        .register_participant(tournament.id, player.id)
        .await
        .unwrap();
    let err = tournaments
        .register_participant(tournament.id, player.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(
        tournaments
            .list_tournament_participants(tournament.id)
            .await
            .unwrap(),
        vec![player.clone()]
    );
    let entered = players.list_player_tournaments(player.id).await.unwrap();
    assert_eq!(entered.len(), 1);
    assert_eq!(entered[0].id, tournament.id);

    tournaments
        .withdraw_participant(tournament.id, player.id)
        .await
        .unwrap();
    assert!(players.list_player_tournaments(player.id).await.unwrap().is_empty());
}
