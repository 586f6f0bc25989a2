use crate::session::SessionStore;
use configuration::Config;
use credentials::PasswordHasher;
use database::DbRepository;
use simulation::ReactionSimulator;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub db_repo: DbRepository,
    pub sessions: SessionStore,
    pub hasher: PasswordHasher,
    pub simulator: ReactionSimulator,
    pub config: Config,
}

impl AppState {
    pub fn new(db_repo: DbRepository, config: Config) -> Self {
        Self {
            sessions: SessionStore::new(config.auth.session_ttl_minutes),
            hasher: PasswordHasher::new(config.auth.pbkdf2_iterations),
            simulator: ReactionSimulator::new(config.simulation.clone()),
            db_repo: db_repo.with_stored_procedure(config.reactions.prefer_stored_procedure),
            config,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.auth.session_cookie
    }
}
