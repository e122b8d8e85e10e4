//! Registry error types.

use std::fmt;

use thiserror::Error;

use crate::player::PlayerId;
use crate::tournament::TournamentId;

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Tournament,
    /// A player that is not registered for the tournament in question
    Participant,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "Player"),
            EntityKind::Tournament => write!(f, "Tournament"),
            EntityKind::Participant => write!(f, "Participant"),
        }
    }
}

/// Transport-independent classification of a [`RegistryError`].
///
/// The HTTP boundary maps these onto status codes; the core only decides the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Conflict,
    Internal,
}

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Requested entity or participation edge does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: i64 },

    /// Tournament references an organizer that does not exist
    #[error("Organizer not found: {0}")]
    OrganizerNotFound(PlayerId),

    /// Malformed input field
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// Player is already on the tournament's participant list
    #[error("Player {player_id} is already registered for tournament {tournament_id}")]
    AlreadyRegistered {
        tournament_id: TournamentId,
        player_id: PlayerId,
    },

    /// Player cannot be deleted while organizing a tournament
    #[error("Player {0} organizes an existing tournament")]
    OrganizerInUse(PlayerId),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row could not be mapped back onto the entity model
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl RegistryError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        RegistryError::NotFound { kind, id }
    }

    /// Classify the error for the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::OrganizerNotFound(_) | RegistryError::InvalidArgument { .. } => {
                ErrorKind::InvalidArgument
            }
            RegistryError::AlreadyRegistered { .. } | RegistryError::OrganizerInUse(_) => {
                ErrorKind::Conflict
            }
            RegistryError::Database(_) | RegistryError::CorruptRecord(_) => ErrorKind::Internal,
        }
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
