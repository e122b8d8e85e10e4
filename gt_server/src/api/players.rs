//! Player API handlers.
//!
//! # Examples
//!
//! Register a player:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/players \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": {"family": "Lee", "given": "Sedol", "is_given_first": false}, "rank": "9d"}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use go_tournament::{EntityKind, NewPlayer, Player, PlayerId, RegistryError, Tournament};

use super::AppState;
use super::error::{ApiJson, ApiResult};
use super::request_id::RequestId;

/// List all players.
///
/// # Response
///
/// Returns `200 OK` with every player, ordered by id.
pub async fn list_players(State(state): State<AppState>) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(state.players.list_all_players().await?))
}

/// Get one player.
///
/// # Errors
///
/// - `404 Not Found`: Unknown player
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<Json<Player>> {
    let player = state
        .players
        .get_player_profile(player_id)
        .await?
        .ok_or_else(|| RegistryError::not_found(EntityKind::Player, player_id))?;
    Ok(Json(player))
}

/// Register a new player.
///
/// `email` and `rank` may be omitted.
///
/// # Response
///
/// Returns `201 Created` with the stored player including its id.
pub async fn create_player(
    State(state): State<AppState>,
    request_id: RequestId,
    ApiJson(request): ApiJson<NewPlayer>,
) -> ApiResult<(StatusCode, Json<Player>)> {
    let player = state.players.register_player(request).await?;
    tracing::debug!(request_id = request_id.as_str(), player_id = player.id, "Player created");
    Ok((StatusCode::CREATED, Json(player)))
}

/// Replace a player's name, email and rank.
///
/// # Errors
///
/// - `404 Not Found`: Unknown player
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    ApiJson(request): ApiJson<NewPlayer>,
) -> ApiResult<Json<Player>> {
    Ok(Json(state.players.update_player(player_id, request).await?))
}

/// Delete a player and their registrations.
///
/// # Errors
///
/// - `404 Not Found`: Unknown player
/// - `409 Conflict`: Player organizes a tournament
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<StatusCode> {
    state.players.remove_player(player_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tournaments the player is registered for.
///
/// # Errors
///
/// - `404 Not Found`: Unknown player
pub async fn list_player_tournaments(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<Json<Vec<Tournament>>> {
    Ok(Json(state.players.list_player_tournaments(player_id).await?))
}
