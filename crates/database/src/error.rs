use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Rejected before any statement was sent.
    #[error("Invalid input: {0}")]
    Validation(#[from] CoreError),

    /// A NOT NULL or CHECK constraint refused the row.
    #[error("A database constraint rejected the data: {0}")]
    Constraint(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("A referenced record does not exist: {0}")]
    Reference(String),

    #[error("A record with the same key already exists: {0}")]
    Duplicate(String),

    /// The called stored function is not installed in this database.
    #[error("Stored routine is not available: {0}")]
    MissingRoutine(String),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

impl DbError {
    /// Maps a PostgreSQL SQLSTATE onto the error taxonomy. `None` means the
    /// code carries no meaning for callers and the raw error should be kept.
    pub fn from_sqlstate(code: &str, detail: String) -> Option<Self> {
        match code {
            "23503" => Some(DbError::Reference(detail)),
            "23505" => Some(DbError::Duplicate(detail)),
            "23502" | "23514" => Some(DbError::Constraint(detail)),
            "42883" => Some(DbError::MissingRoutine(detail)),
            _ => None,
        }
    }

    /// Errors caused by the caller's input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DbError::Validation(_)
                | DbError::Constraint(_)
                | DbError::Reference(_)
                | DbError::Duplicate(_)
                | DbError::NotFound
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return DbError::NotFound;
        }
        if let Some(db_err) = err.as_database_error() {
            let detail = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string());
            if let Some(mapped) = db_err
                .code()
                .and_then(|code| DbError::from_sqlstate(code.as_ref(), detail))
            {
                return mapped;
            }
        }
        DbError::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_integrity_violations() {
        assert!(matches!(
            DbError::from_sqlstate("23503", "reactions_element1_id_fkey".into()),
            Some(DbError::Reference(c)) if c == "reactions_element1_id_fkey"
        ));
        assert!(matches!(
            DbError::from_sqlstate("23505", "elements_symbol_key".into()),
            Some(DbError::Duplicate(_))
        ));
        assert!(matches!(
            DbError::from_sqlstate("23502", "x".into()),
            Some(DbError::Constraint(_))
        ));
        assert!(matches!(
            DbError::from_sqlstate("23514", "x".into()),
            Some(DbError::Constraint(_))
        ));
        assert!(matches!(
            DbError::from_sqlstate("42883", "fn".into()),
            Some(DbError::MissingRoutine(_))
        ));
        assert!(DbError::from_sqlstate("08006", "x".into()).is_none());
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
        assert!(DbError::NotFound.is_client_error());
    }

    #[test]
    fn transport_failures_are_server_errors() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Query(_)));
        assert!(!err.is_client_error());
    }
}
