//! # Go Tournament
//!
//! Player and tournament registration for Go events.
//!
//! Players enter tournaments organized by other players. The registry keeps a
//! single set of `(tournament, player)` participation edges, so a tournament's
//! participant list and a player's tournament list can never disagree.
//!
//! ## Core Modules
//!
//! - [`player`]: Player identity, rank and [`PlayerService`]
//! - [`tournament`]: Tournament lifecycle, registration and [`TournamentService`]
//! - [`db`]: Repository traits with PostgreSQL and in-memory backends
//! - [`errors`]: [`RegistryError`] and its client-facing classification
//!
//! ## Example
//!
//! ```
//! use go_tournament::db::{MemoryStore, Repositories};
//! use go_tournament::{PlayerService, TournamentService};
//!
//! let repos = Repositories::in_memory(MemoryStore::new());
//! let players = PlayerService::from_repositories(&repos);
//! let tournaments = TournamentService::from_repositories(&repos);
//! # let _ = (players, tournaments);
//! ```

/// Persistence gateway: repository traits and their backends.
pub mod db;

/// Error types shared by services and repositories.
pub mod errors;
pub use errors::{EntityKind, ErrorKind, RegistryError, RegistryResult};

/// Players and the player service.
pub mod player;
pub use player::{Name, NewPlayer, Player, PlayerId, PlayerService, Rank};

/// Tournaments and the participation core.
pub mod tournament;
pub use tournament::{
    Ruleset, Tournament, TournamentDto, TournamentId, TournamentService, TournamentUpdate,
};
