use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors surfaced by the task store.
///
/// Every variant carries the driver error that caused it. Nothing here is
/// retried; a missing row on update or delete is not an error at all.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error")]
    Connection(#[source] ConnectionCause),

    #[error("Constraint violated")]
    Constraint(#[source] rusqlite::Error),

    #[error("Query failed")]
    Query(#[source] rusqlite::Error),
}

/// What went wrong while establishing or using the connection.
#[derive(Error, Debug)]
pub enum ConnectionCause {
    #[error(transparent)]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Stable name for each variant, used in logs and CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Connection(_) => "ConnectionError",
            StoreError::Constraint(_) => "ConstraintError",
            StoreError::Query(_) => "QueryError",
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.code),
            _ => None,
        };

        match code {
            Some(ErrorCode::ConstraintViolation) => StoreError::Constraint(err),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied,
            ) => StoreError::Connection(ConnectionCause::Sqlite(err)),
            _ => StoreError::Query(err),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Connection(ConnectionCause::Pool(err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
