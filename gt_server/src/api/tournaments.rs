//! Tournament and participation API handlers.
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Spring Open", "location": "NYC", "start_date": "2026-03-15",
//!        "end_date": "2026-03-17", "ruleset": "AGA", "organizer_id": 1}'
//! ```
//!
//! Register player 2 for tournament 1:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/tournaments/1/participants/2
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use go_tournament::{
    EntityKind, Player, PlayerId, RegistryError, Tournament, TournamentDto, TournamentId,
    TournamentUpdate,
};

use super::AppState;
use super::error::{ApiJson, ApiResult};
use super::request_id::RequestId;

/// List all tournaments with their organizer and participants.
pub async fn list_tournaments(State(state): State<AppState>) -> ApiResult<Json<Vec<Tournament>>> {
    Ok(Json(state.tournaments.list_all_tournaments().await?))
}

/// Get one tournament.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<Json<Tournament>> {
    let tournament = state
        .tournaments
        .get_tournament_details(tournament_id)
        .await?
        .ok_or_else(|| RegistryError::not_found(EntityKind::Tournament, tournament_id))?;
    Ok(Json(tournament))
}

/// Create a tournament.
///
/// Dates are `YYYY-MM-DD` strings.
///
/// # Response
///
/// Returns `201 Created` with the stored tournament; its participant list is empty.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed date or unknown organizer
/// - `422 Unprocessable Entity`: Unknown ruleset or missing field
pub async fn create_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    ApiJson(request): ApiJson<TournamentDto>,
) -> ApiResult<(StatusCode, Json<Tournament>)> {
    let tournament = state.tournaments.add_tournament(request).await?;
    tracing::debug!(
        request_id = request_id.as_str(),
        tournament_id = tournament.id,
        "Tournament created"
    );
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Change a tournament's name, location, dates and ruleset.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed date
/// - `404 Not Found`: Unknown tournament
pub async fn update_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
    ApiJson(request): ApiJson<TournamentUpdate>,
) -> ApiResult<Json<Tournament>> {
    Ok(Json(
        state
            .tournaments
            .update_tournament(tournament_id, request)
            .await?,
    ))
}

/// Delete a tournament and its registrations.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<StatusCode> {
    state.tournaments.remove_tournament(tournament_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Players registered for the tournament.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament
pub async fn list_participants(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(
        state
            .tournaments
            .list_tournament_participants(tournament_id)
            .await?,
    ))
}

/// Register a player for a tournament.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament or player
/// - `409 Conflict`: Player is already registered
pub async fn register_participant(
    State(state): State<AppState>,
    Path((tournament_id, player_id)): Path<(TournamentId, PlayerId)>,
) -> ApiResult<StatusCode> {
    state
        .tournaments
        .register_participant(tournament_id, player_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Withdraw a player from a tournament.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament, or the player is not registered
pub async fn withdraw_participant(
    State(state): State<AppState>,
    Path((tournament_id, player_id)): Path<(TournamentId, PlayerId)>,
) -> ApiResult<StatusCode> {
    state
        .tournaments
        .withdraw_participant(tournament_id, player_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
