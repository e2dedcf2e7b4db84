//! Two-level column schema editing.
//!
//! A schema is an ordered list of root columns, each optionally holding an
//! ordered list of child columns. [`domain::ColumnTree`] implements the pure
//! tree operations; [`application::ColumnSession`] owns a tree for one editing
//! session and enforces what a user may do; [`cli`] is a terminal front end.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
