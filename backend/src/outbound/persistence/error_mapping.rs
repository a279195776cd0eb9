//! Classification of Diesel and pool failures shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// The statement failed for any other reason.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
}

/// Pool failures always surface as connection errors carrying this message.
pub(super) fn pool_message(error: PoolError) -> String {
    error.message().to_owned()
}

pub(super) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DeserializationError(_) => DieselFailure::Query("row decoding error"),
        _ => DieselFailure::Query("database error"),
    }
}
