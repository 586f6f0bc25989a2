use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unknown role '{0}', expected 'teacher' or 'student'")]
    UnknownRole(String),

    #[error("A reaction needs two different elements (both were {0})")]
    SameElement(i32),
}
