//! Application-level errors (wraps domain errors)

use std::fmt;

use thiserror::Error;

use crate::application::form::ValidationError;
use crate::domain::{ColumnId, DomainError};

/// Intent that a column may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedAction {
    AddChild,
    Delete,
    Retype,
}

impl fmt::Display for ProtectedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AddChild => "adding a child",
            Self::Delete => "deleting",
            Self::Retype => "changing the type",
        };
        f.write_str(name)
    }
}

/// Application errors wrap domain errors and add session-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{action} is not available for column {id}")]
    Protected { id: ColumnId, action: ProtectedAction },

    #[error("column not found: {0}")]
    NotFound(ColumnId),

    #[error("no form is open")]
    NoPendingForm,

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
