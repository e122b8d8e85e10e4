//! Tournament lifecycle service and participation management.

use std::sync::Arc;

use log::{info, warn};

use super::models::{
    NewTournament, Tournament, TournamentDto, TournamentId, TournamentUpdate, parse_date,
};
use crate::db::{ParticipationRepository, PlayerRepository, Repositories, TournamentRepository};
use crate::errors::{EntityKind, RegistryError, RegistryResult};
use crate::player::{Player, PlayerId};

/// Tournament service
#[derive(Clone)]
pub struct TournamentService {
    tournaments: Arc<dyn TournamentRepository>,
    players: Arc<dyn PlayerRepository>,
    participation: Arc<dyn ParticipationRepository>,
}

impl TournamentService {
    /// Create a new tournament service
    pub fn new(
        tournaments: Arc<dyn TournamentRepository>,
        players: Arc<dyn PlayerRepository>,
        participation: Arc<dyn ParticipationRepository>,
    ) -> Self {
        Self {
            tournaments,
            players,
            participation,
        }
    }

    pub fn from_repositories(repos: &Repositories) -> Self {
        Self::new(
            repos.tournaments.clone(),
            repos.players.clone(),
            repos.participation.clone(),
        )
    }

    /// List every tournament
    pub async fn list_all_tournaments(&self) -> RegistryResult<Vec<Tournament>> {
        self.tournaments.get_all().await
    }

    /// Get a tournament by id. Absence is `Ok(None)`, not an error.
    pub async fn get_tournament_details(
        &self,
        tournament_id: TournamentId,
    ) -> RegistryResult<Option<Tournament>> {
        self.tournaments.get_by_id(tournament_id).await
    }

    /// Create a tournament with an empty participant list
    ///
    /// # Errors
    ///
    /// * `RegistryError::InvalidArgument` - A date is not `YYYY-MM-DD`
    /// * `RegistryError::OrganizerNotFound` - The organizer id does not resolve to a player
    pub async fn add_tournament(&self, dto: TournamentDto) -> RegistryResult<Tournament> {
        let start_date = parse_date("start_date", &dto.start_date)?;
        let end_date = parse_date("end_date", &dto.end_date)?;

        let organizer = self
            .players
            .get_by_id(dto.organizer_id)
            .await?
            .ok_or(RegistryError::OrganizerNotFound(dto.organizer_id))?;

        if end_date < start_date {
            warn!(
                "Tournament '{}' ends ({}) before it starts ({})",
                dto.name, end_date, start_date
            );
        }

        let tournament = self
            .tournaments
            .add(NewTournament {
                name: dto.name,
                location: dto.location,
                start_date,
                end_date,
                ruleset: dto.ruleset,
                organizer_id: organizer.id,
            })
            .await?;

        info!(
            "Created tournament {} '{}' organized by player {}",
            tournament.id, tournament.name, organizer.id
        );
        Ok(tournament)
    }

    /// Change a tournament's name, location, dates and ruleset
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown tournament
    /// * `RegistryError::InvalidArgument` - A date is not `YYYY-MM-DD`
    pub async fn update_tournament(
        &self,
        tournament_id: TournamentId,
        update: TournamentUpdate,
    ) -> RegistryResult<Tournament> {
        let start_date = parse_date("start_date", &update.start_date)?;
        let end_date = parse_date("end_date", &update.end_date)?;

        let mut tournament = self.require_tournament(tournament_id).await?;
        tournament.name = update.name;
        tournament.location = update.location;
        tournament.start_date = start_date;
        tournament.end_date = end_date;
        tournament.ruleset = update.ruleset;

        self.tournaments.update(&tournament).await?;
        Ok(tournament)
    }

    /// Delete a tournament together with its participation edges
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown tournament
    pub async fn remove_tournament(&self, tournament_id: TournamentId) -> RegistryResult<()> {
        let tournament = self.require_tournament(tournament_id).await?;
        self.tournaments.delete(tournament.id).await?;

        info!(
            "Removed tournament {} ({} participants dropped)",
            tournament.id,
            tournament.participants.len()
        );
        Ok(())
    }

    /// Players registered for the tournament, ordered by id
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown tournament
    pub async fn list_tournament_participants(
        &self,
        tournament_id: TournamentId,
    ) -> RegistryResult<Vec<Player>> {
        Ok(self.require_tournament(tournament_id).await?.participants)
    }

    /// Register a player for a tournament.
    ///
    /// The edge is written once, to the participation set, so both the tournament's
    /// participant list and the player's tournament list reflect it together.
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown tournament or player
    /// * `RegistryError::AlreadyRegistered` - Player is already a participant,
    ///   including when a concurrent registration for the same pair won the race
    pub async fn register_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<()> {
        let tournament = self.require_tournament(tournament_id).await?;

        let player = self
            .players
            .get_by_id(player_id)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Player, player_id))?;

        let already_registered = RegistryError::AlreadyRegistered {
            tournament_id: tournament.id,
            player_id: player.id,
        };

        if tournament.has_participant(player.id) {
            warn!("{already_registered}");
            return Err(already_registered);
        }

        if !self
            .participation
            .add_participant(tournament.id, player.id)
            .await?
        {
            warn!("{already_registered} (concurrent registration)");
            return Err(already_registered);
        }

        info!(
            "Player {} registered for tournament {}",
            player.id, tournament.id
        );
        Ok(())
    }

    /// Withdraw a player from a tournament.
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown tournament, or the player is not a
    ///   participant (`EntityKind::Participant`)
    pub async fn withdraw_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<()> {
        let tournament = self.require_tournament(tournament_id).await?;

        let not_participant = || RegistryError::not_found(EntityKind::Participant, player_id);

        if !tournament.has_participant(player_id) {
            warn!(
                "Player {} is not registered for tournament {}",
                player_id, tournament.id
            );
            return Err(not_participant());
        }

        if !self
            .participation
            .remove_participant(tournament.id, player_id)
            .await?
        {
            return Err(not_participant());
        }

        info!(
            "Player {} withdrew from tournament {}",
            player_id, tournament.id
        );
        Ok(())
    }

    async fn require_tournament(&self, tournament_id: TournamentId) -> RegistryResult<Tournament> {
        self.tournaments
            .get_by_id(tournament_id)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Tournament, tournament_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::errors::ErrorKind;
    use crate::player::{Name, NewPlayer};
    use crate::tournament::Ruleset;
    use chrono::NaiveDate;

    struct Fixture {
        service: TournamentService,
        store: MemoryStore,
        repos: Repositories,
    }

    async fn setup() -> Fixture {
        let store = MemoryStore::new();
        let repos = Repositories::in_memory(store.clone());
        Fixture {
            service: TournamentService::from_repositories(&repos),
            store,
            repos,
        }
    }

    async fn add_player(repos: &Repositories, family: &str, given: &str) -> Player {
        repos
            .players
            .add(NewPlayer::new(Name::new(family, given, true)))
            .await
            .unwrap()
    }

    fn spring_open(organizer_id: PlayerId) -> TournamentDto {
        TournamentDto {
            name: "Spring Open".to_string(),
            location: "NYC".to_string(),
            start_date: "2026-03-15".to_string(),
            end_date: "2026-03-17".to_string(),
            ruleset: Ruleset::Aga,
            organizer_id,
        }
    }

    #[tokio::test]
    async fn test_add_tournament() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;

        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        assert_eq!(tournament.name, "Spring Open");
        assert_eq!(tournament.location, "NYC");
        assert_eq!(
            tournament.start_date,
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert_eq!(
            tournament.end_date,
            NaiveDate::from_ymd_opt(2026, 3, 17).unwrap()
        );
        assert_eq!(tournament.ruleset, Ruleset::Aga);
        assert_eq!(tournament.organizer.id, organizer.id);
        assert!(tournament.participants.is_empty());
    }

    #[tokio::test]
    async fn test_add_tournament_unknown_organizer() {
        let f = setup().await;

        let err = f.service.add_tournament(spring_open(999)).await.unwrap_err();

        assert!(matches!(err, RegistryError::OrganizerNotFound(999)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(f.service.list_all_tournaments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_tournament_bad_date() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;

        let mut dto = spring_open(organizer.id);
        dto.start_date = "March 15th".to_string();

        let err = f.service.add_tournament(dto).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidArgument {
                field: "start_date",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_add_tournament_accepts_end_before_start() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;

        let mut dto = spring_open(organizer.id);
        dto.end_date = "2026-03-14".to_string();

        let tournament = f.service.add_tournament(dto).await.unwrap();
        assert!(tournament.end_date < tournament.start_date);
    }

    #[tokio::test]
    async fn test_get_unknown_tournament_is_none() {
        let f = setup().await;
        assert!(f.service.get_tournament_details(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_tournament() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let created = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        let updated = f
            .service
            .update_tournament(
                created.id,
                TournamentUpdate {
                    name: "Summer Open".to_string(),
                    location: "DC".to_string(),
                    start_date: "2026-06-20".to_string(),
                    end_date: "2026-06-22".to_string(),
                    ruleset: Ruleset::Japanese,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.organizer.id, organizer.id);

        let stored = f
            .service
            .get_tournament_details(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Summer Open");
        assert_eq!(stored.location, "DC");
        assert_eq!(stored.ruleset, Ruleset::Japanese);
        assert_eq!(
            stored.start_date,
            NaiveDate::from_ymd_opt(2026, 6, 20).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_unknown_tournament() {
        let f = setup().await;
        let err = f
            .service
            .update_tournament(
                999,
                TournamentUpdate {
                    name: "Ghost".to_string(),
                    location: "Nowhere".to_string(),
                    start_date: "2026-01-01".to_string(),
                    end_date: "2026-01-02".to_string(),
                    ruleset: Ruleset::Chinese,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_remove_tournament() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();
        f.service
            .register_participant(tournament.id, organizer.id)
            .await
            .unwrap();

        f.service.remove_tournament(tournament.id).await.unwrap();

        assert!(f
            .service
            .get_tournament_details(tournament.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(f.store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_tournament() {
        let f = setup().await;
        let err = f.service.remove_tournament(999).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::Tournament,
                id: 999
            }
        ));
    }

    #[tokio::test]
    async fn test_list_participants_of_unknown_tournament() {
        let f = setup().await;
        let err = f.service.list_tournament_participants(999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_register_participant() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let player = add_player(&f.repos, "Redmond", "Michael").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        f.service
            .register_participant(tournament.id, player.id)
            .await
            .unwrap();

        let participants = f
            .service
            .list_tournament_participants(tournament.id)
            .await
            .unwrap();
        assert_eq!(participants, vec![player.clone()]);

        let entered = f.repos.participation.tournaments_of(player.id).await.unwrap();
        assert_eq!(entered.len(), 1);
        assert_eq!(entered[0].id, tournament.id);
    }

    #[tokio::test]
    async fn test_register_unknown_tournament() {
        let f = setup().await;
        let player = add_player(&f.repos, "Redmond", "Michael").await;

        let err = f
            .service
            .register_participant(999, player.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::Tournament,
                id: 999
            }
        ));
    }

    #[tokio::test]
    async fn test_register_unknown_player() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        let err = f
            .service
            .register_participant(tournament.id, 999)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::Player,
                id: 999
            }
        ));
        assert_eq!(f.store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let player = add_player(&f.repos, "Redmond", "Michael").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        f.service
            .register_participant(tournament.id, player.id)
            .await
            .unwrap();
        let err = f
            .service
            .register_participant(tournament.id, player.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            f.service
                .list_tournament_participants(tournament.id)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(f.store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn test_withdraw_participant() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let player = add_player(&f.repos, "Redmond", "Michael").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();
        f.service
            .register_participant(tournament.id, player.id)
            .await
            .unwrap();

        f.service
            .withdraw_participant(tournament.id, player.id)
            .await
            .unwrap();

        assert!(f
            .service
            .list_tournament_participants(tournament.id)
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .repos
            .participation
            .tournaments_of(player.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_withdraw_unknown_tournament() {
        let f = setup().await;
        let err = f.service.withdraw_participant(999, 1).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::Tournament,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_withdraw_non_participant() {
        let f = setup().await;
        let organizer = add_player(&f.repos, "Smith", "John").await;
        let tournament = f.service.add_tournament(spring_open(organizer.id)).await.unwrap();

        let err = f
            .service
            .withdraw_participant(tournament.id, 999)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::NotFound {
                kind: EntityKind::Participant,
                id: 999
            }
        ));
    }
}
