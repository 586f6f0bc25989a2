//! `DbRepository` and its business actions, split by area. Every submodule
//! adds an `impl DbRepository` block.

use sqlx::postgres::PgPool;

mod elements;
mod equipment;
mod experiments;
mod reactions;
mod reports;
mod tracking;
mod users;

pub use reactions::synthesize_result;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    prefer_stored_procedure: bool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            prefer_stored_procedure: false,
        }
    }

    /// Routes reaction + experiment creation through the
    /// `create_reaction_and_experiment_fn` database function when it exists.
    pub fn with_stored_procedure(mut self, enabled: bool) -> Self {
        self.prefer_stored_procedure = enabled;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
