//! Column id generation.
//!
//! Ids are minted only by the tree itself, through an injected generator.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ColumnId;

/// Source of fresh column ids.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> ColumnId;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> ColumnId + Send,
{
    fn next_id(&mut self) -> ColumnId {
        self()
    }
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> ColumnId {
        ColumnId::new(Uuid::new_v4().to_string())
    }
}

/// `<prefix><n>` ids counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("col-")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ColumnId {
        let id = ColumnId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Millisecond timestamp ids.
///
/// Two ids requested within the same millisecond still differ: the second
/// one is bumped past the last issued value.
#[derive(Debug, Default, Clone)]
pub struct TimestampIds {
    last: i64,
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> ColumnId {
        let now = Utc::now().timestamp_millis();
        let value = if now > self.last { now } else { self.last + 1 };
        self.last = value;
        ColumnId::new(value.to_string())
    }
}

/// Configurable choice of id generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    Uuid,
    Sequential,
    #[default]
    Timestamp,
}

impl IdStrategy {
    /// Build the generator; `prefix` is only used by [`IdStrategy::Sequential`].
    pub fn generator(self, prefix: &str) -> Box<dyn IdGenerator> {
        match self {
            Self::Uuid => Box::new(UuidIds),
            Self::Sequential => Box::new(SequentialIds::new(prefix)),
            Self::Timestamp => Box::new(TimestampIds::default()),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uuid => "uuid",
            Self::Sequential => "sequential",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "sequential" => Ok(Self::Sequential),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}
