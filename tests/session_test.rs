//! Tests for ColumnSession: dialogs, protection and validation

use coltree::application::{
    ApplicationError, ColumnForm, ColumnSession, FormIntent, ProtectedAction, SubmitOutcome,
    ValidationError,
};
use coltree::config::Settings;
use coltree::domain::{ColumnId, ColumnKind, ColumnTree, IdStrategy, SequentialIds, SortDirection};
use coltree::util::testing;
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn session() -> ColumnSession {
    ColumnSession::with_tree(ColumnTree::seeded(), Box::new(SequentialIds::new("c")))
}

fn form(title: &str, kind: Option<ColumnKind>) -> ColumnForm {
    ColumnForm::new(title, kind)
}

// ============================================================
// Construction
// ============================================================

#[test]
fn given_settings_without_seed_when_creating_session_then_tree_empty() {
    let settings = Settings {
        seed_fixed_columns: false,
        id_strategy: IdStrategy::Sequential,
        sequential_prefix: "x".into(),
        ..Settings::default()
    };

    let mut session = ColumnSession::new(&settings);
    let id = session.add_root(&form("a", Some(ColumnKind::Remark))).unwrap();

    assert_eq!(session.tree().len(), 1);
    assert_eq!(id.as_str(), "x1");
    assert_eq!(session.sort_direction(), SortDirection::Ascending);
}

#[test]
fn given_default_settings_when_creating_session_then_fixed_columns_seeded() {
    let session = ColumnSession::new(&Settings::default());

    let records = session.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.kind == ColumnKind::Fixed));
}

// ============================================================
// New root / new child dialogs
// ============================================================

#[rstest]
fn given_new_root_dialog_when_submitting_then_created_and_dialog_closed(
    mut session: ColumnSession,
) {
    // Arrange
    session.open_new_root();
    assert_eq!(session.pending(), Some(&FormIntent::NewRoot));

    // Act
    let outcome = session
        .submit(&form("  单价 ", Some(ColumnKind::UserFilled)))
        .unwrap();

    // Assert
    let SubmitOutcome::Created { id, parent_id } = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(parent_id, None);
    assert_eq!(session.tree().get(&id).unwrap().title(), Some("单价"));
    assert!(session.pending().is_none());
}

#[rstest]
#[case::blank_title("   ", Some(ColumnKind::Remark), ValidationError::TitleRequired)]
#[case::missing_kind("a", None, ValidationError::KindRequired)]
#[case::fixed_kind("a", Some(ColumnKind::Fixed), ValidationError::KindNotSelectable(ColumnKind::Fixed))]
fn given_invalid_form_when_submitting_then_dialog_stays_open(
    mut session: ColumnSession,
    #[case] title: &str,
    #[case] kind: Option<ColumnKind>,
    #[case] expected: ValidationError,
) {
    session.open_new_root();

    let err = session.submit(&form(title, kind)).unwrap_err();

    assert!(matches!(err, ApplicationError::Validation(ref e) if *e == expected));
    assert_eq!(session.pending(), Some(&FormIntent::NewRoot));
    assert_eq!(session.tree().len(), 3);

    // corrected form goes through on the same dialog
    session.submit(&form("ok", Some(ColumnKind::Remark))).unwrap();
    assert_eq!(session.tree().len(), 4);
}

#[rstest]
fn given_no_dialog_when_submitting_then_no_pending_form(mut session: ColumnSession) {
    let err = session
        .submit(&form("a", Some(ColumnKind::Remark)))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::NoPendingForm));
}

#[rstest]
fn given_open_dialog_when_cancelled_then_tree_unchanged(mut session: ColumnSession) {
    session.open_new_root();

    let closed = session.cancel();

    assert_eq!(closed, Some(FormIntent::NewRoot));
    assert!(session.pending().is_none());
    assert_eq!(session.tree().len(), 3);
}

#[rstest]
fn given_fixed_column_when_opening_new_child_then_protected(mut session: ColumnSession) {
    let err = session.open_new_child(&ColumnId::from("name")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Protected {
            action: ProtectedAction::AddChild,
            ..
        }
    ));
    assert!(session.pending().is_none());
}

#[rstest]
fn given_unknown_parent_when_opening_new_child_then_not_found(mut session: ColumnSession) {
    let err = session.open_new_child(&ColumnId::from("nope")).unwrap_err();

    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[rstest]
fn given_regular_root_when_adding_child_then_created_under_parent(mut session: ColumnSession) {
    // Arrange
    let root = session
        .add_root(&form("单价", Some(ColumnKind::UserFilled)))
        .unwrap();

    // Act
    session.open_new_child(&root).unwrap();
    let outcome = session
        .submit(&form("子列A", Some(ColumnKind::Customized)))
        .unwrap();

    // Assert
    assert!(matches!(
        outcome,
        SubmitOutcome::Created { parent_id: Some(ref p), .. } if *p == root
    ));
    assert_eq!(session.tree().children(&root).unwrap().len(), 1);
}

#[rstest]
fn given_child_column_when_adding_grandchild_then_protected(mut session: ColumnSession) {
    let root = session.add_root(&form("r", Some(ColumnKind::Remark))).unwrap();
    let child = session
        .add_child(&root, &form("c", Some(ColumnKind::Remark)))
        .unwrap();

    let err = session
        .add_child(&child, &form("g", Some(ColumnKind::Remark)))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Protected { .. }));
    assert!(session.pending().is_none());
}

// ============================================================
// Edit dialog
// ============================================================

#[rstest]
fn given_regular_column_when_opening_edit_then_prefilled(mut session: ColumnSession) {
    let id = session
        .add_root(&form("单价", Some(ColumnKind::UserFilled)))
        .unwrap();

    let prefilled = session.open_edit(&id).unwrap();

    assert_eq!(prefilled.title, "单价");
    assert_eq!(prefilled.kind, Some(ColumnKind::UserFilled));
    assert!(matches!(
        session.pending(),
        Some(FormIntent::Edit { fixed: false, .. })
    ));
}

#[rstest]
fn given_fixed_column_when_editing_title_then_renamed_and_still_fixed(
    mut session: ColumnSession,
) {
    let id = ColumnId::from("code");
    let prefilled = session.open_edit(&id).unwrap();
    assert_eq!(prefilled.kind, None);

    let outcome = session.submit(&form("No.", None)).unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Updated {
            id: id.clone(),
            matched: true
        }
    );
    let view = session.tree().get(&id).unwrap();
    assert_eq!(view.title(), Some("No."));
    assert_eq!(view.kind(), ColumnKind::Fixed);
}

#[rstest]
fn given_fixed_column_when_retyping_then_protected(mut session: ColumnSession) {
    session.open_edit(&ColumnId::from("code")).unwrap();

    let err = session
        .submit(&form("No.", Some(ColumnKind::Remark)))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Protected {
            action: ProtectedAction::Retype,
            ..
        }
    ));
    assert!(session.pending().is_some());
}

#[rstest]
fn given_column_deleted_while_editing_when_submitting_then_unmatched(
    mut session: ColumnSession,
) {
    // Arrange
    let id = session.add_root(&form("a", Some(ColumnKind::Remark))).unwrap();
    session.open_edit(&id).unwrap();
    assert!(session.delete(&id).unwrap());
    let before = session.records();

    // Act
    let outcome = session
        .submit(&form("b", Some(ColumnKind::Remark)))
        .unwrap();

    // Assert
    assert_eq!(outcome, SubmitOutcome::Updated { id, matched: false });
    assert_eq!(session.records(), before);
}

#[rstest]
fn given_unknown_id_when_editing_then_not_found(mut session: ColumnSession) {
    let err = session
        .edit(&ColumnId::from("nope"), &form("x", None))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::NotFound(_)));
}

// ============================================================
// Delete and sort
// ============================================================

#[rstest]
fn given_fixed_column_when_deleting_then_protected(mut session: ColumnSession) {
    let err = session.delete(&ColumnId::from("remark")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Protected {
            action: ProtectedAction::Delete,
            ..
        }
    ));
    assert_eq!(session.tree().len(), 3);
}

#[rstest]
fn given_unknown_id_when_deleting_then_false(mut session: ColumnSession) {
    assert!(!session.delete(&ColumnId::from("nope")).unwrap());
    assert_eq!(session.tree().len(), 3);
}

#[rstest]
fn given_root_with_child_when_deleting_then_both_gone(mut session: ColumnSession) {
    let root = session.add_root(&form("r", Some(ColumnKind::Remark))).unwrap();
    let child = session
        .add_child(&root, &form("c", Some(ColumnKind::Remark)))
        .unwrap();

    assert!(session.delete(&root).unwrap());

    assert!(!session.tree().contains(&root));
    assert!(!session.tree().contains(&child));
}

#[rstest]
fn given_session_when_toggling_sort_then_direction_alternates(mut session: ColumnSession) {
    let first = session.toggle_sort();
    assert_eq!(first.applied, SortDirection::Ascending);
    assert_eq!(first.next, SortDirection::Descending);
    assert_eq!(session.sort_direction(), SortDirection::Descending);

    let second = session.toggle_sort();
    assert_eq!(second.applied, SortDirection::Descending);
    assert_eq!(session.sort_direction(), SortDirection::Ascending);

    let ids: Vec<String> = session
        .tree()
        .roots()
        .iter()
        .map(|v| v.id().to_string())
        .collect();
    assert_eq!(ids, vec!["code", "remark", "name"]);
}

// ============================================================
// One-shot edit
// ============================================================

#[rstest]
fn given_existing_column_when_editing_directly_then_matched_and_no_dialog_left(
    mut session: ColumnSession,
) {
    let id = session.add_root(&form("a", Some(ColumnKind::Remark))).unwrap();

    let matched = session
        .edit(&id, &form("b", Some(ColumnKind::UserFilled)))
        .unwrap();

    assert!(matched);
    let view = session.tree().get(&id).unwrap();
    assert_eq!(view.title(), Some("b"));
    assert_eq!(view.kind(), ColumnKind::UserFilled);
    assert!(session.pending().is_none());
}

#[rstest]
fn given_fixed_column_when_retyping_directly_then_protected_and_no_dialog_left(
    mut session: ColumnSession,
) {
    let err = session
        .edit(&ColumnId::from("name"), &form("品名", Some(ColumnKind::Remark)))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Protected {
            action: ProtectedAction::Retype,
            ..
        }
    ));
    assert!(session.pending().is_none());
    assert_eq!(
        session.tree().get(&ColumnId::from("name")).unwrap().title(),
        Some("名称")
    );
}

#[rstest]
fn given_fixed_kind_when_adding_root_then_rejected_before_reaching_tree(
    mut session: ColumnSession,
) {
    let err = session
        .add_root(&form("sys", Some(ColumnKind::Fixed)))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Validation(ValidationError::KindNotSelectable(ColumnKind::Fixed))
    ));
    assert_eq!(session.tree().len(), 3);
}
