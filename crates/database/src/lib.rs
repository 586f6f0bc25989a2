//! # SIMLAB Database Crate
//!
//! The only place in the workspace that speaks SQL. It owns the schema
//! (embedded migrations), the connection pool and `DbRepository`, whose
//! methods are the lab's business actions: registering accounts, curating
//! the element and equipment catalogue, creating reactions together with
//! their first experiment, tracking what students look at and run, and the
//! teacher reports built from that tracking.
//!
//! Queries are bound at runtime (`sqlx::query_as`), so the crate builds
//! without a live database.

pub mod connection;
pub mod error;
pub mod fallback;
pub mod repository;

pub use connection::{connect, connect_lazy, database_url, ping, run_migrations};
pub use error::DbError;
pub use fallback::{OptionalFallback, ReadFallback};
pub use repository::{synthesize_result, DbRepository};
