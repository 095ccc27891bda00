//! SQLite error mapping.
//!
//! Maps `rusqlite::Error` and `tokio_rusqlite::Error` to the
//! `ExecutionError` taxonomy from `iyiye_core::statement`, tagging the
//! zero-based index of the failing statement.

use iyiye_core::statement::{ExecutionError, ExecutionErrorKind};

/// Maps a rusqlite error raised by the statement at `statement_index`.
///
/// Constraint violations (unique, primary key, foreign key, check) map to
/// `ConstraintViolation`; unparseable statements and bad parameters to
/// `BadRequest`; connection-level failures to `ConnectionFailed`; anything
/// else to `Backend`. The backend message is carried verbatim.
pub fn map_rusqlite_error(err: &rusqlite::Error, statement_index: usize) -> ExecutionError {
    let kind = match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ExecutionErrorKind::ConstraintViolation
        }
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            ExecutionErrorKind::ConnectionFailed
        }
        rusqlite::Error::SqlInputError { .. } | rusqlite::Error::InvalidParameterName(_) => {
            ExecutionErrorKind::BadRequest
        }
        _ => ExecutionErrorKind::Backend,
    };

    ExecutionError::new(statement_index, kind, err.to_string())
}

/// Maps a tokio_rusqlite transport error (the statement never ran, so the
/// failure is attributed to the start of the batch).
pub fn map_connection_error(err: tokio_rusqlite::Error) -> ExecutionError {
    match err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(&rusqlite_err, 0),
        tokio_rusqlite::Error::Close(_) => ExecutionError::new(
            0,
            ExecutionErrorKind::ConnectionFailed,
            "connection closed unexpectedly",
        ),
        other => ExecutionError::new(0, ExecutionErrorKind::ConnectionFailed, other.to_string()),
    }
}
