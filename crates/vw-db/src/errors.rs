use std::fmt::Display;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Failure while preparing the database at start-up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot init database pool: {0}")]
    Pool(String),
    #[error("cannot run database migrations: {0}")]
    Migration(String),
}

/// A failed store operation, tagged with the operation it was raised in.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("{operation}: database unavailable: {message}")]
    Unavailable { operation: String, message: String },

    #[error("{operation}: no matching row")]
    NotFound { operation: String },

    #[error("{operation}: unknown platform")]
    UnknownPlatform { operation: String },

    #[error("{operation}: {message}")]
    Query { operation: String, message: String },
}

impl DatabaseError {
    pub fn from_diesel(operation: &str, err: DieselError) -> Self {
        let operation = operation.to_string();
        match err {
            DieselError::NotFound => Self::NotFound { operation },
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Self::UnknownPlatform { operation }
            }
            other => Self::Query {
                operation,
                message: other.to_string(),
            },
        }
    }

    pub fn unavailable(operation: &str, message: impl Display) -> Self {
        Self::Unavailable {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub fn query(operation: &str, message: impl Display) -> Self {
        Self::Query {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
