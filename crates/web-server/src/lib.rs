//! # SIMLAB Web Server
//!
//! The HTTP face of the lab: session login, role-gated pages served as JSON
//! payloads, the laboratory API and teacher reports.

use configuration::Config;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod gate;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;

pub use router::build_router;
pub use state::AppState;

/// How often idle sessions are swept out of memory.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Connects to the database, applies migrations if configured, and serves
/// until the process is stopped.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&db_pool).await?;
    }

    let app_state = Arc::new(AppState::new(DbRepository::new(db_pool), config));

    let sweeper_state = Arc::clone(&app_state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sweeper_state.sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions removed");
            }
        }
    });

    let app = build_router(app_state);

    tracing::info!("Web server started and listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
