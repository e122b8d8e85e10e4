//! Repository trait definitions for testability and dependency injection.
//!
//! The services only ever see these traits. Two backends implement them:
//! PostgreSQL (this module) and [`MemoryStore`](super::memory::MemoryStore).
//!
//! Participation is stored once, as a set of `(tournament, player)` edges owned by
//! [`ParticipationRepository`]. A tournament's participant list and a player's
//! tournament list are both read from that set, so they cannot disagree.
//!
//! Deletion policy, identical in every backend:
//! - deleting a player who organizes a tournament fails with
//!   [`RegistryError::OrganizerInUse`]
//! - deleting a player or tournament drops all of its participation edges

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::errors::{EntityKind, RegistryError, RegistryResult};
use crate::player::{Name, NewPlayer, Player, PlayerId, Rank};
use crate::tournament::{NewTournament, Ruleset, Tournament, TournamentId};

/// Postgres SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Named in the migration so a failed insert can tell which end is missing
const PARTICIPANT_PLAYER_FK: &str = "tournament_participants_player_fk";

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// All players, ordered by id
    async fn get_all(&self) -> RegistryResult<Vec<Player>>;

    /// Find player by ID; `None` for an unknown id
    async fn get_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>>;

    /// Insert a player and return it with its assigned id
    async fn add(&self, player: NewPlayer) -> RegistryResult<Player>;

    /// Overwrite a stored player's fields
    async fn update(&self, player: &Player) -> RegistryResult<()>;

    /// Delete a player, cascading their participation edges
    async fn delete(&self, id: PlayerId) -> RegistryResult<()>;
}

/// Trait for tournament repository operations
///
/// Every returned [`Tournament`] has its organizer and participants loaded.
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// All tournaments, ordered by id
    async fn get_all(&self) -> RegistryResult<Vec<Tournament>>;

    /// Find tournament by ID; `None` for an unknown id
    async fn get_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>>;

    /// Insert a tournament and return it with its assigned id
    async fn add(&self, tournament: NewTournament) -> RegistryResult<Tournament>;

    /// Overwrite a stored tournament's scalar fields. Organizer and participants are
    /// not touched.
    async fn update(&self, tournament: &Tournament) -> RegistryResult<()>;

    /// Delete a tournament, cascading its participation edges
    async fn delete(&self, id: TournamentId) -> RegistryResult<()>;
}

/// Trait for the participation edge set
#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    /// Add the edge. Returns `false` if it already existed.
    async fn add_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool>;

    /// Remove the edge. Returns `false` if it did not exist.
    async fn remove_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool>;

    /// Tournaments the player is registered for, ordered by id
    async fn tournaments_of(&self, player_id: PlayerId) -> RegistryResult<Vec<Tournament>>;
}

const PLAYER_COLUMNS: &str = "id, family_name, given_name, is_given_first, email, rank";

const TOURNAMENT_SELECT: &str = r#"
    SELECT t.id, t.name, t.location, t.start_date, t.end_date, t.ruleset,
           o.id AS organizer_id, o.family_name AS organizer_family_name,
           o.given_name AS organizer_given_name,
           o.is_given_first AS organizer_is_given_first,
           o.email AS organizer_email, o.rank AS organizer_rank
    FROM tournaments t
    JOIN players o ON o.id = t.organizer_id
"#;

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

/// Constraint named by a foreign key violation, if `e` is one
fn violated_foreign_key(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            Some(db.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

/// Map a player row. `prefix` selects aliased columns, e.g. `"organizer_"`.
fn player_from_row(row: &PgRow, prefix: &str) -> RegistryResult<Player> {
    let col = |name: &str| format!("{prefix}{name}");

    let rank = row
        .try_get::<Option<i16>, _>(col("rank").as_str())?
        .map(|ordinal| {
            Rank::from_ordinal(ordinal)
                .ok_or_else(|| RegistryError::CorruptRecord(format!("rank ordinal {ordinal}")))
        })
        .transpose()?;

    Ok(Player {
        id: row.try_get(col("id").as_str())?,
        name: Name {
            family: row.try_get(col("family_name").as_str())?,
            given: row.try_get(col("given_name").as_str())?,
            is_given_first: row.try_get(col("is_given_first").as_str())?,
        },
        email: row.try_get(col("email").as_str())?,
        rank,
    })
}

/// Default PostgreSQL implementation of `PlayerRepository`
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn get_all(&self) -> RegistryResult<Vec<Player>> {
        let rows = sqlx::query(&format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|r| player_from_row(r, "")).collect()
    }

    async fn get_by_id(&self, id: PlayerId) -> RegistryResult<Option<Player>> {
        let row = sqlx::query(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| player_from_row(&r, "")).transpose()
    }

    async fn add(&self, player: NewPlayer) -> RegistryResult<Player> {
        let row = sqlx::query(
            "INSERT INTO players (family_name, given_name, is_given_first, email, rank)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&player.name.family)
        .bind(&player.name.given)
        .bind(player.name.is_given_first)
        .bind(&player.email)
        .bind(player.rank.map(Rank::ordinal))
        .fetch_one(&self.pool)
        .await?;

        Ok(player.into_player(row.try_get("id")?))
    }

    async fn update(&self, player: &Player) -> RegistryResult<()> {
        let result = sqlx::query(
            "UPDATE players
             SET family_name = $1, given_name = $2, is_given_first = $3, email = $4, rank = $5
             WHERE id = $6",
        )
        .bind(&player.name.family)
        .bind(&player.name.given)
        .bind(player.name.is_given_first)
        .bind(&player.email)
        .bind(player.rank.map(Rank::ordinal))
        .bind(player.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(EntityKind::Player, player.id));
        }
        Ok(())
    }

    async fn delete(&self, id: PlayerId) -> RegistryResult<()> {
        // tournaments.organizer_id is ON DELETE RESTRICT, tournament_participants cascades
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    RegistryError::OrganizerInUse(id)
                } else {
                    RegistryError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(EntityKind::Player, id));
        }
        Ok(())
    }
}

/// Default PostgreSQL implementation of `TournamentRepository`
pub struct PgTournamentRepository {
    pool: PgPool,
}

impl PgTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build a tournament from a `TOURNAMENT_SELECT` row and load its participants
async fn hydrate_tournament(pool: &PgPool, row: &PgRow) -> RegistryResult<Tournament> {
    let id: TournamentId = row.try_get("id")?;
    let ruleset: String = row.try_get("ruleset")?;

    let participant_rows = sqlx::query(
        "SELECT p.id, p.family_name, p.given_name, p.is_given_first, p.email, p.rank
         FROM tournament_participants tp
         JOIN players p ON p.id = tp.player_id
         WHERE tp.tournament_id = $1
         ORDER BY p.id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Tournament {
        id,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        ruleset: ruleset.parse::<Ruleset>().map_err(RegistryError::CorruptRecord)?,
        organizer: player_from_row(row, "organizer_")?,
        participants: participant_rows
            .iter()
            .map(|r| player_from_row(r, ""))
            .collect::<RegistryResult<_>>()?,
    })
}

#[async_trait]
impl TournamentRepository for PgTournamentRepository {
    async fn get_all(&self) -> RegistryResult<Vec<Tournament>> {
        let rows = sqlx::query(&format!("{TOURNAMENT_SELECT} ORDER BY t.id"))
            .fetch_all(&self.pool)
            .await?;

        let mut tournaments = Vec::with_capacity(rows.len());
        for row in &rows {
            tournaments.push(hydrate_tournament(&self.pool, row).await?);
        }
        Ok(tournaments)
    }

    async fn get_by_id(&self, id: TournamentId) -> RegistryResult<Option<Tournament>> {
        let row = sqlx::query(&format!("{TOURNAMENT_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(hydrate_tournament(&self.pool, &row).await?)),
            None => Ok(None),
        }
    }

    async fn add(&self, tournament: NewTournament) -> RegistryResult<Tournament> {
        let row = sqlx::query(
            "INSERT INTO tournaments (name, location, start_date, end_date, ruleset, organizer_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&tournament.name)
        .bind(&tournament.location)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(tournament.ruleset.as_str())
        .bind(tournament.organizer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RegistryError::OrganizerNotFound(tournament.organizer_id)
            } else {
                RegistryError::Database(e)
            }
        })?;

        let id: TournamentId = row.try_get("id")?;
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Tournament, id))
    }

    async fn update(&self, tournament: &Tournament) -> RegistryResult<()> {
        let result = sqlx::query(
            "UPDATE tournaments
             SET name = $1, location = $2, start_date = $3, end_date = $4, ruleset = $5
             WHERE id = $6",
        )
        .bind(&tournament.name)
        .bind(&tournament.location)
        .bind(tournament.start_date)
        .bind(tournament.end_date)
        .bind(tournament.ruleset.as_str())
        .bind(tournament.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(EntityKind::Tournament, tournament.id));
        }
        Ok(())
    }

    async fn delete(&self, id: TournamentId) -> RegistryResult<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(EntityKind::Tournament, id));
        }
        Ok(())
    }
}

/// Default PostgreSQL implementation of `ParticipationRepository`
///
/// The composite primary key on `tournament_participants` makes each edge write a
/// single atomic row operation, so concurrent registrations for the same pair
/// cannot both succeed.
pub struct PgParticipationRepository {
    pool: PgPool,
}

impl PgParticipationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for PgParticipationRepository {
    async fn add_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool> {
        let result = sqlx::query(
            "INSERT INTO tournament_participants (tournament_id, player_id)
             VALUES ($1, $2)
             ON CONFLICT (tournament_id, player_id) DO NOTHING",
        )
        .bind(tournament_id)
        .bind(player_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_foreign_key(&e) {
            Some(PARTICIPANT_PLAYER_FK) => RegistryError::not_found(EntityKind::Player, player_id),
            Some(_) => RegistryError::not_found(EntityKind::Tournament, tournament_id),
            None => RegistryError::Database(e),
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistryResult<bool> {
        let result = sqlx::query(
            "DELETE FROM tournament_participants WHERE tournament_id = $1 AND player_id = $2",
        )
        .bind(tournament_id)
        .bind(player_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn tournaments_of(&self, player_id: PlayerId) -> RegistryResult<Vec<Tournament>> {
        let rows = sqlx::query(&format!(
            "{TOURNAMENT_SELECT}
             JOIN tournament_participants tp ON tp.tournament_id = t.id
             WHERE tp.player_id = $1
             ORDER BY t.id"
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tournaments = Vec::with_capacity(rows.len());
        for row in &rows {
            tournaments.push(hydrate_tournament(&self.pool, row).await?);
        }
        Ok(tournaments)
    }
}
