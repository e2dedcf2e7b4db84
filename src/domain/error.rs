//! Domain-level errors

use thiserror::Error;

use crate::domain::ColumnId;

/// Domain errors represent violations of the tree's structural invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate column id: {0}")]
    DuplicateId(ColumnId),

    #[error("fixed columns are seeded by the system and cannot be inserted")]
    FixedKind,

    #[error("id generator produced no unused id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
