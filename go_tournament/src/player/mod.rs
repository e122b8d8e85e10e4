//! Players: identity, rank and the lifecycle service.
//!
//! ## Example
//!
//! ```
//! use go_tournament::db::{MemoryStore, Repositories};
//! use go_tournament::player::{Name, NewPlayer, PlayerService, Rank};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repos = Repositories::in_memory(MemoryStore::new());
//!     let players = PlayerService::from_repositories(&repos);
//!
//!     let player = players
//!         .register_player(NewPlayer::new(Name::new("Lee", "Sedol", false)).with_rank(Rank::Dan9))
//!         .await?;
//!     assert_eq!(player.name.full_name(), "Lee Sedol");
//!
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod service;

pub use models::{Name, NewPlayer, Player, PlayerId, Rank};
pub use service::PlayerService;
