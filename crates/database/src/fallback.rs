//! Read-path degradation.
//!
//! Listing and report pages prefer showing nothing over showing an error, so
//! failed reads are logged here and replaced by an empty value. Writes never
//! go through this trait.

use crate::error::DbError;

pub trait ReadFallback<T> {
    /// The value on success, otherwise `T::default()` after logging.
    fn or_empty(self, operation: &str) -> T
    where
        T: Default;
}

impl<T> ReadFallback<T> for Result<T, DbError> {
    fn or_empty(self, operation: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(operation, error = %e, "Read failed; returning an empty result");
                T::default()
            }
        }
    }
}

/// Same policy for lookups of a single row.
pub trait OptionalFallback<T> {
    fn or_none(self, operation: &str) -> Option<T>;
}

impl<T> OptionalFallback<T> for Result<Option<T>, DbError> {
    fn or_none(self, operation: &str) -> Option<T> {
        self.or_empty(operation)
    }
}
