use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AuthSettings, Config, DatabaseSettings, LoggingSettings, ReactionSettings, ReportSettings,
    ServerSettings, SimulationSettings,
};

/// Prefix for environment overrides, e.g. `SIMLAB__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SIMLAB";

/// Longest accepted session lifetime (30 days).
pub const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Longest accepted simulated run (one hour of one-second samples).
pub const MAX_SIMULATION_SECS: u32 = 60 * 60;

/// Loads the application configuration from `config.toml` (if present) and
/// `SIMLAB__*` environment variables.
///
/// This function is the primary entry point for this crate. It layers the
/// sources, deserializes them into our strongly-typed `Config` struct,
/// validates it, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Same as [`load_config`] with an explicit file path. A missing file is not
/// an error; every setting has a default.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Rejects settings that would make the server misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.auth.pbkdf2_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "auth.pbkdf2_iterations must be at least 1".to_string(),
            ));
        }
        if self.auth.session_cookie.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.session_cookie must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.auth.session_ttl_minutes) {
            return Err(ConfigError::ValidationError(format!(
                "auth.session_ttl_minutes must be between 1 and {MAX_SESSION_TTL_MINUTES}"
            )));
        }
        if !(0.0..=1.0).contains(&self.simulation.cooling_rate) {
            return Err(ConfigError::ValidationError(
                "simulation.cooling_rate must be between 0 and 1".to_string(),
            ));
        }
        if self.simulation.duration_secs > MAX_SIMULATION_SECS {
            return Err(ConfigError::ValidationError(format!(
                "simulation.duration_secs must be at most {MAX_SIMULATION_SECS}"
            )));
        }
        if self.reports.low_activity_threshold < 1 {
            return Err(ConfigError::ValidationError(
                "reports.low_activity_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
