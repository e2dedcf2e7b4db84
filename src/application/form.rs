//! Column dialog: what the user submits and how it is checked
//!
//! # Invariants
//! - Title must not be blank after trim.
//! - A type is required unless the dialog edits a fixed column.
//! - `Fixed` is never a selectable type.

use thiserror::Error;

use crate::domain::{ColumnFields, ColumnId, ColumnKind, ColumnView};

/// What the open dialog will do on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIntent {
    NewRoot,
    NewChild { parent_id: ColumnId },
    Edit { id: ColumnId, fixed: bool },
}

impl FormIntent {
    /// Whether the type field is shown for this dialog.
    pub fn asks_kind(&self) -> bool {
        !matches!(self, Self::Edit { fixed: true, .. })
    }
}

/// Field-level validation failures, reported inline next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,

    #[error("column type is required")]
    KindRequired,

    #[error("column type {0} cannot be chosen")]
    KindNotSelectable(ColumnKind),
}

/// Raw dialog values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnForm {
    pub title: String,
    pub kind: Option<ColumnKind>,
}

impl ColumnForm {
    pub fn new(title: impl Into<String>, kind: Option<ColumnKind>) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }

    /// Values an edit dialog opens with.
    pub fn prefill(view: &ColumnView<'_>) -> Self {
        let kind = view.kind();
        Self {
            title: view.title().unwrap_or_default().to_string(),
            kind: (!kind.is_fixed()).then_some(kind),
        }
    }

    /// Check the values against the dialog's intent.
    ///
    /// The title is trimmed. For a fixed column the type field is hidden,
    /// so any submitted kind is dropped.
    pub fn validate(&self, intent: &FormIntent) -> Result<ColumnFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        let kind = if intent.asks_kind() {
            match self.kind {
                None => return Err(ValidationError::KindRequired),
                Some(kind) if !ColumnKind::selectable().contains(&kind) => {
                    return Err(ValidationError::KindNotSelectable(kind))
                }
                Some(kind) => Some(kind),
            }
        } else {
            None
        };

        Ok(ColumnFields {
            title: Some(title.to_string()),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn given_blank_title_when_validating_then_title_required(#[case] title: &str) {
        let form = ColumnForm::new(title, Some(ColumnKind::Remark));
        assert_eq!(
            form.validate(&FormIntent::NewRoot),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn given_missing_kind_when_creating_then_kind_required() {
        let form = ColumnForm::new("a", None);
        assert_eq!(
            form.validate(&FormIntent::NewChild {
                parent_id: "p".into()
            }),
            Err(ValidationError::KindRequired)
        );
    }

    #[test]
    fn given_fixed_kind_when_creating_then_not_selectable() {
        let form = ColumnForm::new("a", Some(ColumnKind::Fixed));
        assert_eq!(
            form.validate(&FormIntent::NewRoot),
            Err(ValidationError::KindNotSelectable(ColumnKind::Fixed))
        );
    }

    #[test]
    fn given_fixed_edit_when_validating_then_kind_dropped() {
        let form = ColumnForm::new("  Code ", Some(ColumnKind::Remark));
        let fields = form
            .validate(&FormIntent::Edit {
                id: "code".into(),
                fixed: true,
            })
            .unwrap();
        assert_eq!(fields, ColumnFields::title("Code"));
    }

    #[test]
    fn given_valid_values_when_validating_then_fields_trimmed() {
        let form = ColumnForm::new(" 子列A ", Some(ColumnKind::Customized));
        let fields = form.validate(&FormIntent::NewRoot).unwrap();
        assert_eq!(fields, ColumnFields::new("子列A", ColumnKind::Customized));
    }
}
