//! Shared mapping of pool and Diesel failures into repository errors.

use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool errors into repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors into repository errors.
///
/// Unique-index rejections keep the constraint message so services can
/// distinguish a lost create race from an ordinary query failure.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    RepositoryError::unique_violation(info.message().to_owned())
                }
                DatabaseErrorKind::ClosedConnection => {
                    RepositoryError::connection("database connection error")
                }
                _ => RepositoryError::query("database error"),
            }
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(&other),
                "diesel operation failed"
            );
            RepositoryError::query("database error")
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_failures_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("pool timed out"));
        assert_eq!(err, RepositoryError::connection("pool timed out"));
    }

    #[rstest]
    fn not_found_becomes_a_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, RepositoryError::Query { .. }));
    }

    #[rstest]
    fn unique_violations_are_preserved() {
        let err = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        ));
        assert!(matches!(err, RepositoryError::UniqueViolation { .. }));
    }
}
