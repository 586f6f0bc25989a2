use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use simulation::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(db_err) => match db_err {
                DbError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                DbError::Constraint(_) => (
                    StatusCode::BAD_REQUEST,
                    "The submitted data violates a rule of the lab".to_string(),
                ),
                DbError::Duplicate(_) => (
                    StatusCode::CONFLICT,
                    "A record with the same key already exists".to_string(),
                ),
                DbError::Reference(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "A referenced record does not exist; check your ids".to_string(),
                ),
                DbError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                ),
            },
            AppError::Simulation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response. Server-side
/// failures are logged in full and answered with a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected.");
        }

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;

    #[test]
    fn client_errors_keep_their_meaning() {
        let cases = [
            (AppError::from(DbError::Validation(CoreError::SameElement(1))), StatusCode::BAD_REQUEST),
            (AppError::from(DbError::Duplicate("elements_symbol_key".into())), StatusCode::CONFLICT),
            (AppError::from(DbError::Reference("fk".into())), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::from(DbError::NotFound), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn database_text_is_not_leaked() {
        let err = AppError::from(DbError::ConnectionConfigError("postgres://secret".into()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
