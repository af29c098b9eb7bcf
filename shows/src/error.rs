pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Any failure originating from the persistence layer.
///
/// Absence of a record is never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("constraint violated: {0}")]
    Constraint(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("invalid show: {0}")]
    Invalid(String),
    #[error("invalid database configuration: {0}")]
    Configuration(String),
    #[error("no show ids left to assign")]
    IdsExhausted,
}

impl StorageError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let unavailable = matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        );
        let violation = err.as_database_error().is_some_and(|db| is_violation(db));

        if unavailable {
            Self::Unavailable(err)
        } else if violation {
            Self::Constraint(err)
        } else {
            Self::Query(err)
        }
    }
}

fn is_violation(err: &dyn sqlx::error::DatabaseError) -> bool {
    err.is_unique_violation() || err.is_foreign_key_violation() || err.is_check_violation()
        // not_null_violation
        || err.code().as_deref() == Some("23502")
}
