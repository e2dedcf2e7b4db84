//! Editing session: owns the current tree and drives every change to it
//!
//! The presentation layer creates one session per editing context, forwards
//! user intents to it and redraws from [`ColumnSession::tree`] afterwards.

use std::fmt;

use tracing::{debug, info};

use crate::application::{
    ApplicationError, ApplicationResult, ColumnForm, FormIntent, ProtectedAction,
};
use crate::config::Settings;
use crate::domain::{ColumnId, ColumnRecord, ColumnTree, IdGenerator, SortDirection};

/// Result of a successful dialog submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created {
        id: ColumnId,
        parent_id: Option<ColumnId>,
    },
    /// `matched` is false when the edited column no longer exists.
    Updated { id: ColumnId, matched: bool },
}

/// Result of a sort toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    /// Direction the tree is now sorted in
    pub applied: SortDirection,
    /// Direction the next toggle will apply
    pub next: SortDirection,
}

pub struct ColumnSession {
    tree: ColumnTree,
    sort_direction: SortDirection,
    pending: Option<FormIntent>,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for ColumnSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSession")
            .field("tree", &self.tree)
            .field("sort_direction", &self.sort_direction)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl ColumnSession {
    /// Start a session as configured: seeded or empty, with the configured ids.
    pub fn new(settings: &Settings) -> Self {
        let tree = if settings.seed_fixed_columns {
            ColumnTree::seeded()
        } else {
            ColumnTree::new()
        };
        let ids = settings.id_strategy.generator(&settings.sequential_prefix);
        Self::with_tree(tree, ids)
    }

    pub fn with_tree(tree: ColumnTree, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            tree,
            sort_direction: SortDirection::default(),
            pending: None,
            ids,
        }
    }

    pub fn tree(&self) -> &ColumnTree {
        &self.tree
    }

    pub fn records(&self) -> Vec<ColumnRecord> {
        self.tree.to_records()
    }

    /// Direction the next sort toggle will apply.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn pending(&self) -> Option<&FormIntent> {
        self.pending.as_ref()
    }

    // ------------------------------------------------------------
    // Dialog lifecycle
    // ------------------------------------------------------------

    pub fn open_new_root(&mut self) {
        self.pending = Some(FormIntent::NewRoot);
    }

    /// Open the new-child dialog; refused for fixed columns and children.
    pub fn open_new_child(&mut self, parent_id: &ColumnId) -> ApplicationResult<()> {
        let actions = self
            .tree
            .actions(parent_id)
            .ok_or_else(|| ApplicationError::NotFound(parent_id.clone()))?;
        if !actions.add_child {
            return Err(ApplicationError::Protected {
                id: parent_id.clone(),
                action: ProtectedAction::AddChild,
            });
        }
        self.pending = Some(FormIntent::NewChild {
            parent_id: parent_id.clone(),
        });
        Ok(())
    }

    /// Open the edit dialog and return its prefilled values.
    pub fn open_edit(&mut self, id: &ColumnId) -> ApplicationResult<ColumnForm> {
        let view = self
            .tree
            .get(id)
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        let form = ColumnForm::prefill(&view);
        self.pending = Some(FormIntent::Edit {
            id: id.clone(),
            fixed: view.kind().is_fixed(),
        });
        Ok(form)
    }

    /// Close the dialog without touching the tree.
    pub fn cancel(&mut self) -> Option<FormIntent> {
        self.pending.take()
    }

    /// Validate `form` against the open dialog and apply it.
    ///
    /// On any error the dialog stays open and the tree is unchanged.
    pub fn submit(&mut self, form: &ColumnForm) -> ApplicationResult<SubmitOutcome> {
        let intent = self.pending.clone().ok_or(ApplicationError::NoPendingForm)?;

        let outcome = match intent {
            FormIntent::NewRoot => SubmitOutcome::Created {
                id: self.create_root(form)?,
                parent_id: None,
            },
            FormIntent::NewChild { parent_id } => SubmitOutcome::Created {
                id: self.create_child(&parent_id, form)?,
                parent_id: Some(parent_id),
            },
            FormIntent::Edit { id, fixed } => {
                let matched = self.apply_edit(&id, fixed, form)?;
                SubmitOutcome::Updated { id, matched }
            }
        };

        self.pending = None;
        debug!("submit applied: {:?}", outcome);
        Ok(outcome)
    }

    fn create_root(&mut self, form: &ColumnForm) -> ApplicationResult<ColumnId> {
        let fields = form.validate(&FormIntent::NewRoot)?;
        let (tree, id) = self.tree.insert_root(&fields, self.ids.as_mut())?;
        self.tree = tree;
        Ok(id)
    }

    fn create_child(
        &mut self,
        parent_id: &ColumnId,
        form: &ColumnForm,
    ) -> ApplicationResult<ColumnId> {
        let intent = FormIntent::NewChild {
            parent_id: parent_id.clone(),
        };
        let fields = form.validate(&intent)?;
        let (tree, id) = self
            .tree
            .insert_child(parent_id, &fields, self.ids.as_mut())?;
        let id = id.ok_or_else(|| ApplicationError::Protected {
            id: parent_id.clone(),
            action: ProtectedAction::AddChild,
        })?;
        self.tree = tree;
        Ok(id)
    }

    /// Returns whether the column still existed.
    fn apply_edit(
        &mut self,
        id: &ColumnId,
        fixed: bool,
        form: &ColumnForm,
    ) -> ApplicationResult<bool> {
        if fixed && form.kind.is_some_and(|kind| !kind.is_fixed()) {
            return Err(ApplicationError::Protected {
                id: id.clone(),
                action: ProtectedAction::Retype,
            });
        }
        let intent = FormIntent::Edit {
            id: id.clone(),
            fixed,
        };
        let fields = form.validate(&intent)?;

        let matched = self.tree.contains(id);
        if !matched {
            debug!("edited column {} vanished before submit", id);
        }
        self.tree = self.tree.update(id, &fields);
        Ok(matched)
    }

    // ------------------------------------------------------------
    // Direct intents
    // ------------------------------------------------------------

    /// Delete a column and its children.
    ///
    /// Returns false for an unknown id; fixed columns are refused.
    pub fn delete(&mut self, id: &ColumnId) -> ApplicationResult<bool> {
        match self.tree.actions(id) {
            None => {
                debug!("delete of unknown column {} ignored", id);
                Ok(false)
            }
            Some(actions) if !actions.delete => Err(ApplicationError::Protected {
                id: id.clone(),
                action: ProtectedAction::Delete,
            }),
            Some(_) => {
                self.tree = self.tree.delete(id);
                Ok(true)
            }
        }
    }

    /// Sort all sibling groups in the current direction, then flip it.
    pub fn toggle_sort(&mut self) -> SortOutcome {
        let applied = self.sort_direction;
        let (tree, next) = self.tree.toggle_sort(applied);
        self.tree = tree;
        self.sort_direction = next;
        info!("sort order switched to {}", next);
        SortOutcome { applied, next }
    }

    // ------------------------------------------------------------
    // One-shot helpers: open + submit, leaving no dialog open
    // ------------------------------------------------------------

    pub fn add_root(&mut self, form: &ColumnForm) -> ApplicationResult<ColumnId> {
        self.open_new_root();
        let created = self.create_root(form);
        self.pending = None;
        created
    }

    pub fn add_child(
        &mut self,
        parent_id: &ColumnId,
        form: &ColumnForm,
    ) -> ApplicationResult<ColumnId> {
        self.open_new_child(parent_id)?;
        let created = self.create_child(parent_id, form);
        self.pending = None;
        created
    }

    /// Edit a column; returns whether the column was found.
    pub fn edit(&mut self, id: &ColumnId, form: &ColumnForm) -> ApplicationResult<bool> {
        self.open_edit(id)?;
        let fixed = self
            .tree
            .get(id)
            .is_some_and(|view| view.kind().is_fixed());
        let matched = self.apply_edit(id, fixed, form);
        self.pending = None;
        matched
    }
}
