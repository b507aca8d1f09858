//! Optional last-seen log of joined sessions.
//!
//! The relay never reads from the store and never waits on it. Writes are
//! spawned off the connection task and failures end in the log.

use async_trait::async_trait;
use waypoint_common::Result;

/// Destination for session join records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert the session, or refresh `last_seen` if it is already known.
    async fn record_join(&self, session_id: &str, user_agent: Option<&str>) -> Result<()>;
}

#[cfg(feature = "postgres")]
pub use postgres::PgSessionStore;

#[cfg(feature = "postgres")]
mod postgres {
    use std::time::Duration;

    use async_trait::async_trait;
    use sqlx::postgres::{PgPool, PgPoolOptions};
    use waypoint_common::{Result, WaypointError};

    use super::SessionStore;

    const CREATE_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id VARCHAR(50) PRIMARY KEY,
            last_seen TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            user_agent TEXT
        )
    "#;

    const UPSERT_SESSION: &str = r#"
        INSERT INTO sessions (id, last_seen, user_agent)
        VALUES ($1, NOW(), $2)
        ON CONFLICT (id) DO UPDATE SET last_seen = NOW()
    "#;

    fn persistence(e: sqlx::Error) -> WaypointError {
        WaypointError::Persistence(e.to_string())
    }

    /// Postgres-backed session log: one `sessions` row per session id.
    #[derive(Clone)]
    pub struct PgSessionStore {
        pool: PgPool,
    }

    impl PgSessionStore {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        /// Open a lazy pool and create the `sessions` table in the background.
        ///
        /// Returns without touching the network. Only a malformed URL fails
        /// here; an unreachable database shows up as `DB: init error` and
        /// later `DB: save error` lines.
        pub fn connect(database_url: &str) -> Result<Self> {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
                .connect_lazy(database_url)
                .map_err(persistence)?;

            let store = Self::new(pool);
            let init = store.clone();
            tokio::spawn(async move {
                match init.ensure_schema().await {
                    Ok(()) => tracing::info!("DB: sessions table ready"),
                    Err(e) => tracing::error!(error = %e, "DB: init error"),
                }
            });
            Ok(store)
        }

        pub async fn ensure_schema(&self) -> Result<()> {
            sqlx::query(CREATE_TABLE)
                .execute(&self.pool)
                .await
                .map_err(persistence)?;
            Ok(())
        }
    }

    #[async_trait]
    impl SessionStore for PgSessionStore {
        async fn record_join(&self, session_id: &str, user_agent: Option<&str>) -> Result<()> {
            sqlx::query(UPSERT_SESSION)
                .bind(session_id)
                .bind(user_agent)
                .execute(&self.pool)
                .await
                .map_err(persistence)?;
            Ok(())
        }
    }

}
