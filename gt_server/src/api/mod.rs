//! HTTP API for the tournament registry.
//!
//! # Modules
//!
//! - [`players`]: Player lifecycle and a player's tournaments
//! - [`tournaments`]: Tournament lifecycle and participant registration
//! - [`error`]: Registry error to HTTP status mapping
//! - [`request_id`]: Request correlation IDs
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                         - Health check
//! GET    /api/v1/players                                 - List players
//! POST   /api/v1/players                                 - Register player
//! GET    /api/v1/players/{id}                            - Get player
//! PUT    /api/v1/players/{id}                            - Update player
//! DELETE /api/v1/players/{id}                            - Delete player
//! GET    /api/v1/players/{id}/tournaments                - Player's tournaments
//! GET    /api/v1/tournaments                             - List tournaments
//! POST   /api/v1/tournaments                             - Create tournament
//! GET    /api/v1/tournaments/{id}                        - Get tournament
//! PUT    /api/v1/tournaments/{id}                        - Update tournament
//! DELETE /api/v1/tournaments/{id}                        - Delete tournament
//! GET    /api/v1/tournaments/{id}/participants           - List participants
//! POST   /api/v1/tournaments/{id}/participants/{player}  - Register participant
//! DELETE /api/v1/tournaments/{id}/participants/{player}  - Withdraw participant
//! ```
//!
//! Errors are returned as `{"error": "..."}` with 404, 400, 409 or 500.
//! Request bodies that are not JSON of the expected shape get the same body
//! with 400, 415 or 422.
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod error;
pub mod players;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use go_tournament::db::{Database, Repositories};
use go_tournament::{PlayerService, TournamentService};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the services are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub players: Arc<PlayerService>,
    pub tournaments: Arc<TournamentService>,
    /// Present for the postgres backend; used by the health check
    pub database: Option<Database>,
}

impl AppState {
    /// Build both services over the same repositories
    pub fn new(repos: &Repositories, database: Option<Database>) -> Self {
        Self {
            players: Arc::new(PlayerService::from_repositories(repos)),
            tournaments: Arc::new(TournamentService::from_repositories(repos)),
            database,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use gt_server::api::{create_router, AppState};
/// # use go_tournament::db::{MemoryStore, Repositories};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::in_memory(MemoryStore::new());
/// let app = create_router(AppState::new(&repos, None));
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    let player_routes = Router::new()
        .route(
            "/players",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/players/{player_id}",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route(
            "/players/{player_id}/tournaments",
            get(players::list_player_tournaments),
        );

    let tournament_routes = Router::new()
        .route(
            "/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route(
            "/tournaments/{tournament_id}",
            get(tournaments::get_tournament)
                .put(tournaments::update_tournament)
                .delete(tournaments::delete_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/participants",
            get(tournaments::list_participants),
        )
        .route(
            "/tournaments/{tournament_id}/participants/{player_id}",
            post(tournaments::register_participant).delete(tournaments::withdraw_participant),
        );

    Router::new().merge(player_routes).merge(tournament_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the storage backend is reachable, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","backend":"postgres","database":true,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (backend, db_healthy) = match &state.database {
        Some(db) => ("postgres", db.health_check().await.is_ok()),
        None => ("memory", true),
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "backend": backend,
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
