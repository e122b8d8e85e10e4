//! In-memory implementation of all three repositories.
//!
//! Backs the test suites and the server's `memory` storage backend. A single lock
//! guards players, tournaments and the edge set, so every repository call is atomic
//! and the deletion policy matches the PostgreSQL schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repository::{ParticipationRepository, PlayerRepository, TournamentRepository};
use crate::errors::{EntityKind, RegistryError, RegistryResult};
use crate::player::{NewPlayer, Player, PlayerId};
use crate::tournament::{NewTournament, Tournament, TournamentId};

/// Stored tournament row; organizer and participants are resolved on read
#[derive(Debug, Clone)]
struct TournamentRow {
    tournament: NewTournament,
}

#[derive(Debug, Default)]
struct State {
    players: BTreeMap<PlayerId, Player>,
    tournaments: BTreeMap<TournamentId, TournamentRow>,
    /// Participation edges as (tournament, player)
    edges: BTreeSet<(TournamentId, PlayerId)>,
    next_player_id: PlayerId,
    next_tournament_id: TournamentId,
}

impl State {
    fn load_tournament(&self, id: TournamentId) -> RegistryResult<Option<Tournament>> {
        let Some(row) = self.tournaments.get(&id) else {
            return Ok(None);
        };

        let organizer = self
            .players
            .get(&row.tournament.organizer_id)
            .cloned()
            .ok_or_else(|| {
                RegistryError::CorruptRecord(format!(
                    "tournament {id} references missing organizer {}",
                    row.tournament.organizer_id
                ))
            })?;

        let participants = self
            .edges
            .range((id, PlayerId::MIN)..=(id, PlayerId::MAX))
            .filter_map(|(_, player_id)| self.players.get(player_id).cloned())
            .collect();

        let t = &row.tournament;
        Ok(Some(Tournament {
            id,
            name: t.name.clone(),
            location: t.location.clone(),
            start_date: t.start_date,
            end_date: t.end_date,
            ruleset: t.ruleset,
            organizer,
            participants,
        }))
    }
}

/// Shared in-memory store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of participation edges, across all tournaments
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }
}

#[async_trait]
impl PlayerRepository for MemoryStore {
    async fn get_all(&self) -> RegistryResult<Vec<Player>> {
        Ok(self.state.read().await.players.values().cloned().collect())
    }

    async fn get_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>> {
        Ok(self.state.read().await.players.get(&id).cloned())
    }

    async fn add(&self, player: NewPlayer) -> RegistryResult<Player> {
        let mut state = self.state.write().await;
        state.next_player_id += 1;
        let player = player.into_player(state.next_player_id);
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn update(&self, player: &Player) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .players
            .get_mut(&player.id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Player, player.id))?;
        *stored = player.clone();
        Ok(())
    }

    async fn delete(&self, id: PlayerId) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        if !state.players.contains_key(&id) {
            return Err(RegistryError::not_found(EntityKind::Player, id));
        }

        // restrict: organizer
        if state
            .tournaments
            .values()
            .any(|row| row.tournament.organizer_id == id)
        {
            return Err(RegistryError::OrganizerInUse(id));
        }

        // cascade: participation
        state.edges.retain(|&(_, player_id)| player_id != id);
        state.players.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TournamentRepository for MemoryStore {
    async fn get_all(&self) -> RegistryResult<Vec<Tournament>> {
        let state = self.state.read().await;
        let mut tournaments = Vec::with_capacity(state.tournaments.len());
        for id in state.tournaments.keys() {
            if let Some(tournament) = state.load_tournament(*id)? {
                tournaments.push(tournament);
            }
        }
        Ok(tournaments)
    }

    async fn get_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>> {
        self.state.read().await.load_tournament(id)
    }

    async fn add(&self, tournament: NewTournament) -> RegistryResult<Tournament> {
        let mut state = self.state.write().await;
        if !state.players.contains_key(&tournament.organizer_id) {
            return Err(RegistryError::OrganizerNotFound(tournament.organizer_id));
        }

        state.next_tournament_id += 1;
        let id = state.next_tournament_id;
        state.tournaments.insert(id, TournamentRow { tournament });

        state
            .load_tournament(id)?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Tournament, id))
    }

    async fn update(&self, tournament: &Tournament) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .tournaments
            .get_mut(&tournament.id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Tournament, tournament.id))?;

        row.tournament.name = tournament.name.clone();
        row.tournament.location = tournament.location.clone();
        row.tournament.start_date = tournament.start_date;
        row.tournament.end_date = tournament.end_date;
        row.tournament.ruleset = tournament.ruleset;
        Ok(())
    }

    async fn delete(&self, id: TournamentId) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        if state.tournaments.remove(&id).is_none() {
            return Err(RegistryError::not_found(EntityKind::Tournament, id));
        }
        state.edges.retain(|&(tournament_id, _)| tournament_id != id);
        Ok(())
    }
}

#[async_trait]
impl ParticipationRepository for MemoryStore {
    async fn add_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool> {
        let mut state = self.state.write().await;
        // Same referential checks the foreign keys perform in PostgreSQL
        if !state.tournaments.contains_key(&tournament_id) {
            return Err(RegistryError::not_found(EntityKind::Tournament, tournament_id));
        }
        if !state.players.contains_key(&player_id) {
            return Err(RegistryError::not_found(EntityKind::Player, player_id));
        }
        Ok(state.edges.insert((tournament_id, player_id)))
    }

    async fn remove_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .edges
            .remove(&(tournament_id, player_id)))
    }

    async fn tournaments_of(&self, player_id: PlayerId) -> RegistryResult<Vec<Tournament>> {
        let state = self.state.read().await;
        let mut tournaments = Vec::new();
        for &(tournament_id, _) in state.edges.iter().filter(|(_, p)| *p == player_id) {
            if let Some(tournament) = state.load_tournament(tournament_id)? {
                tournaments.push(tournament);
            }
        }
        Ok(tournaments)
    }
}
