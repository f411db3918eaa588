use crate::application::ports::RepositoryError;

/// Maps a sqlx failure onto the port error, surfacing unique-key races separately.
pub(crate) fn query_failed(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::ConnectionFailed(error.to_string())
        }
        _ => RepositoryError::QueryFailed(error.to_string()),
    }
}

pub(crate) fn corrupt(field: &str, detail: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::CorruptRow(format!("{}: {}", field, detail))
}
