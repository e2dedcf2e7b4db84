//! Domain layer: the column tree and its operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod collation;
pub mod entities;
pub mod error;
pub mod ids;

pub use arena::{ColumnActions, ColumnTree, ColumnView, TreeIterator};
pub use collation::compare_titles;
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use ids::{IdGenerator, IdStrategy, SequentialIds, TimestampIds, UuidIds};
