//! Player lifecycle service.

use std::sync::Arc;

use log::{info, warn};

use super::models::{NewPlayer, Player, PlayerId};
use crate::db::{ParticipationRepository, PlayerRepository, Repositories};
use crate::errors::{EntityKind, RegistryError, RegistryResult};
use crate::tournament::Tournament;

/// Player service
#[derive(Clone)]
pub struct PlayerService {
    players: Arc<dyn PlayerRepository>,
    participation: Arc<dyn ParticipationRepository>,
}

impl PlayerService {
    /// Create a new player service
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        participation: Arc<dyn ParticipationRepository>,
    ) -> Self {
        Self {
            players,
            participation,
        }
    }

    pub fn from_repositories(repos: &Repositories) -> Self {
        Self::new(repos.players.clone(), repos.participation.clone())
    }

    /// List every player
    pub async fn list_all_players(&self) -> RegistryResult<Vec<Player>> {
        self.players.get_all().await
    }

    /// Get a player by id. Absence is `Ok(None)`, not an error.
    pub async fn get_player_profile(&self, player_id: PlayerId) -> RegistryResult<Option<Player>> {
        self.players.get_by_id(player_id).await
    }

    /// Store a new player and return it with its assigned id.
    ///
    /// Names are not required to be unique.
    pub async fn register_player(&self, player: NewPlayer) -> RegistryResult<Player> {
        let player = self.players.add(player).await?;
        info!(
            "Registered player {} ({})",
            player.id,
            player.name.full_name()
        );
        Ok(player)
    }

    /// Replace a player's name, email and rank
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown player
    pub async fn update_player(
        &self,
        player_id: PlayerId,
        data: NewPlayer,
    ) -> RegistryResult<Player> {
        self.require_player(player_id).await?;

        let player = data.into_player(player_id);
        self.players.update(&player).await?;
        Ok(player)
    }

    /// Delete a player.
    ///
    /// The player's participation edges are removed with them. A player who still
    /// organizes a tournament cannot be deleted.
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown player
    /// * `RegistryError::OrganizerInUse` - Player organizes a tournament
    pub async fn remove_player(&self, player_id: PlayerId) -> RegistryResult<()> {
        let player = self.require_player(player_id).await?;

        if let Err(e) = self.players.delete(player.id).await {
            warn!("Failed to remove player {}: {}", player.id, e);
            return Err(e);
        }

        info!("Removed player {}", player.id);
        Ok(())
    }

    /// Tournaments the player is registered for
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - Unknown player
    pub async fn list_player_tournaments(
        &self,
        player_id: PlayerId,
    ) -> RegistryResult<Vec<Tournament>> {
        let player = self.require_player(player_id).await?;
        self.participation.tournaments_of(player.id).await
    }

    async fn require_player(&self, player_id: PlayerId) -> RegistryResult<Player> {
        self.players
            .get_by_id(player_id)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Player, player_id))
    }
}
