//! Domain entities: columns, their kinds and the snapshot records handed to renderers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `parentId` reported for root columns.
pub const ROOT_PARENT_ID: &str = "-1";

/// Unique column identifier, shared by roots and children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ColumnId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Column type.
///
/// `Fixed` columns are pre-seeded by the system: they cannot be deleted,
/// retyped or given children, and a user can never choose the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnKind {
    #[default]
    #[serde(rename = "CUSTOMIZE")]
    Customized,
    #[serde(rename = "FIXED")]
    Fixed,
    #[serde(rename = "REMARK")]
    Remark,
    #[serde(rename = "USER_FILL")]
    UserFilled,
}

impl ColumnKind {
    /// Kinds offered to the user when creating or retyping a column.
    pub const fn selectable() -> [ColumnKind; 3] {
        [Self::Customized, Self::Remark, Self::UserFilled]
    }

    pub fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed)
    }

    /// Wire name, as used in serialized records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customized => "CUSTOMIZE",
            Self::Fixed => "FIXED",
            Self::Remark => "REMARK",
            Self::UserFilled => "USER_FILL",
        }
    }

    /// Display label shown in the type column of the schema table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Customized => "自定义逻辑",
            Self::Fixed => "系统默认",
            Self::Remark => "备注列",
            Self::UserFilled => "用户填列",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown column type '{}' (expected customize, remark, user-fill or fixed)",
            self.0
        )
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for ColumnKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "customize" | "customized" => Ok(Self::Customized),
            "fixed" => Ok(Self::Fixed),
            "remark" => Ok(Self::Remark),
            "user_fill" | "user_filled" | "userfill" => Ok(Self::UserFilled),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Payload stored for every column in the tree.
///
/// Level and parent linkage are not part of the payload: they follow from
/// where the column sits in [`crate::domain::ColumnTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub title: Option<String>,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: Option<String>, kind: ColumnKind) -> Self {
        Self {
            id: id.into(),
            title,
            kind,
        }
    }

    /// A system column that is protected from deletion and retyping.
    pub fn fixed(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self::new(id, Some(title.into()), ColumnKind::Fixed)
    }

    /// Apply submitted fields in place.
    ///
    /// Absent fields keep the current value. A kind change is ignored when
    /// either side is `Fixed`.
    pub(crate) fn apply(&mut self, fields: &ColumnFields) {
        if let Some(title) = &fields.title {
            self.title = Some(title.clone());
        }
        if let Some(kind) = fields.kind {
            if !self.kind.is_fixed() && !kind.is_fixed() {
                self.kind = kind;
            }
        }
    }
}

/// Values carried by a create or edit submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFields {
    pub title: Option<String>,
    pub kind: Option<ColumnKind>,
}

impl ColumnFields {
    pub fn new(title: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            title: Some(title.into()),
            kind: Some(kind),
        }
    }

    /// Fields that only rename.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            kind: None,
        }
    }
}

/// Direction of the title sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializable snapshot of one column and its children.
///
/// `children` is `None` for a column that never had a child list and
/// `Some(vec![])` for one whose children were all deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRecord {
    pub id: ColumnId,
    pub parent_id: String,
    pub level: u8,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    pub children: Option<Vec<ColumnRecord>>,
}

/// The system columns every new schema starts with.
pub fn default_fixed_columns() -> Vec<Column> {
    vec![
        Column::fixed("code", "编号"),
        Column::fixed("name", "名称"),
        Column::fixed("remark", "工料概要说明"),
    ]
}
