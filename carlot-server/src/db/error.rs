//! Database error type

use sqlx::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("no value bound for named parameter :{0}")]
    MissingParam(String),

    #[error("named placeholders are not enabled on this connection")]
    NamedPlaceholdersDisabled,

    /// Data refused by the strict session mode (in-memory source)
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("connection unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    /// True when the database refused the caller's data rather than
    /// failing on its own.
    pub fn is_rejected_data(&self) -> bool {
        match self {
            Self::Rejected(_) => true,
            Self::Sqlx(sqlx::Error::Database(e)) => {
                matches!(e.kind(), ErrorKind::NotNullViolation | ErrorKind::CheckViolation)
                    || e.code().is_some_and(|code| code.starts_with("22"))
            }
            _ => false,
        }
    }
}
