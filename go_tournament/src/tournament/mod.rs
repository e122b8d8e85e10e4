//! Tournaments and the participation core.
//!
//! A tournament has exactly one organizer and any number of participants.
//! Participation is stored once, as a `(tournament, player)` edge, and both the
//! tournament's participant list and the player's tournament list are read from it.
//!
//! ## Example
//!
//! ```
//! use go_tournament::db::{MemoryStore, Repositories};
//! use go_tournament::player::{Name, NewPlayer, PlayerService};
//! use go_tournament::tournament::{Ruleset, TournamentDto, TournamentService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repos = Repositories::in_memory(MemoryStore::new());
//!     let players = PlayerService::from_repositories(&repos);
//!     let tournaments = TournamentService::from_repositories(&repos);
//!
//!     let organizer = players
//!         .register_player(NewPlayer::new(Name::new("Smith", "John", true)))
//!         .await?;
//!
//!     let tournament = tournaments
//!         .add_tournament(TournamentDto {
//!             name: "Spring Open".to_string(),
//!             location: "NYC".to_string(),
//!             start_date: "2026-03-15".to_string(),
//!             end_date: "2026-03-17".to_string(),
//!             ruleset: Ruleset::Aga,
//!             organizer_id: organizer.id,
//!         })
//!         .await?;
//!
//!     tournaments
//!         .register_participant(tournament.id, organizer.id)
//!         .await?;
//!     assert_eq!(players.list_player_tournaments(organizer.id).await?.len(), 1);
//!
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod service;

pub use models::{
    DATE_FORMAT, NewTournament, Ruleset, Tournament, TournamentDto, TournamentId,
    TournamentUpdate, parse_date,
};
pub use service::TournamentService;
