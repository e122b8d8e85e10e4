//! Persistence gateway: PostgreSQL connection pooling, schema setup and the
//! repository traits the services are written against.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub mod config;
pub mod memory;
pub mod repository;

pub use config::{DEFAULT_DATABASE_URL, DatabaseConfig};
pub use memory::MemoryStore;
pub use repository::{
    ParticipationRepository, PgParticipationRepository, PgPlayerRepository,
    PgTournamentRepository, PlayerRepository, TournamentRepository,
};

/// Schema for players, tournaments and the participation edge table
const SCHEMA: &str = include_str!("../../migrations/0001_initial.sql");

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use go_tournament::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), sqlx::Error> {
    ///     let db = Database::new(&DatabaseConfig::from_env()).await?;
    ///     db.migrate().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        log::info!("Database schema is up to date");
        Ok(())
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// PostgreSQL-backed repositories sharing this pool
    pub fn repositories(&self) -> Repositories {
        Repositories {
            players: Arc::new(PgPlayerRepository::new(self.pool.clone())),
            tournaments: Arc::new(PgTournamentRepository::new(self.pool.clone())),
            participation: Arc::new(PgParticipationRepository::new(self.pool.clone())),
        }
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// One handle per repository, all backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub players: Arc<dyn PlayerRepository>,
    pub tournaments: Arc<dyn TournamentRepository>,
    pub participation: Arc<dyn ParticipationRepository>,
}

impl Repositories {
    /// Repositories over a shared in-memory store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            players: store.clone(),
            tournaments: store.clone(),
            participation: store,
        }
    }
}
