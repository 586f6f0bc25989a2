use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub reactions: ReactionSettings,
    pub reports: ReportSettings,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Connection pool parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Overrides the `DATABASE_URL` environment variable when set.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply the embedded migrations when the server starts.
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

/// Credential hashing and session parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// PBKDF2-HMAC-SHA256 rounds for newly hashed passwords.
    pub pbkdf2_iterations: u32,
    /// Name of the cookie carrying the session id.
    pub session_cookie: String,
    /// Idle lifetime of a session.
    pub session_ttl_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: 100_000,
            session_cookie: "simlab_session".to_string(),
            session_ttl_minutes: 12 * 60,
        }
    }
}

/// How the reaction + experiment transaction is executed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReactionSettings {
    /// Call the `create_reaction_and_experiment_fn` stored function first,
    /// falling back to the client-side transaction when it is missing.
    pub prefer_stored_procedure: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Students with fewer participations than this show up in the
    /// low-activity report.
    pub low_activity_threshold: i64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            low_activity_threshold: 3,
        }
    }
}

/// Parameters of the didactic temperature model shown while a reaction runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Starting and equilibrium temperature in °C.
    pub ambient_temperature: f64,
    /// Heat added per second per unit of reactivity.
    pub heating_gain: f64,
    /// Fraction of the excess over ambient lost per second.
    pub cooling_rate: f64,
    pub duration_secs: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ambient_temperature: 25.0,
            heating_gain: 0.9,
            cooling_rate: 0.05,
            duration_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set (e.g. "info,sqlx=warn").
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,sqlx=warn,tower_http=info".to_string(),
            directory: None,
            file_prefix: "simlab.log".to_string(),
        }
    }
}
