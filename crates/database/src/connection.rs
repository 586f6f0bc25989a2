use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Resolves the connection string: the configured URL wins, otherwise
/// `DATABASE_URL` from the environment or a `.env` file.
pub fn database_url(settings: &DatabaseSettings) -> Result<String, DbError> {
    if let Some(url) = settings.url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(url.to_string());
    }

    // A missing .env file is fine; the variable may already be exported.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))
}

fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is shared by every request handler; each operation borrows a
/// connection for its own duration and returns it afterwards.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let url = database_url(settings)?;
    let pool = pool_options(settings).connect(&url).await?;
    tracing::info!(
        max_connections = settings.max_connections,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Builds a pool that opens connections on first use. Used by tests and
/// tools that must start without a reachable database.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let url = database_url(settings)?;
    Ok(pool_options(settings).connect_lazy(&url)?)
}

/// Applies the embedded migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Round-trips a trivial query. Never fails; an unreachable database is
/// reported as `false` and logged.
pub async fn ping(pool: &PgPool) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "Database ping failed");
            false
        }
    }
}
