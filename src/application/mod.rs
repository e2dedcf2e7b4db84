//! Application layer: the editing session and its form contract
//!
//! This layer drives the domain tree on behalf of a presentation layer.

pub mod error;
pub mod form;
pub mod session;

pub use error::{ApplicationError, ApplicationResult, ProtectedAction};
pub use form::{ColumnForm, FormIntent, ValidationError};
pub use session::{ColumnSession, SortOutcome, SubmitOutcome};
