//! Arena-backed two-level column hierarchy.
//!
//! Every mutating operation borrows the current tree and returns a new one;
//! the receiver is never changed.

use std::cmp::Reverse;
use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::collation::CollationKey;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::ids::IdGenerator;
use crate::domain::{
    default_fixed_columns, Column, ColumnFields, ColumnId, ColumnKind, ColumnRecord,
    SortDirection, ROOT_PARENT_ID,
};

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub(crate) struct ColumnNode {
    /// Column payload
    pub(crate) data: Column,
    /// Index of the owning root, None for root columns
    pub(crate) parent: Option<Index>,
    /// Child indices; None until the first child is added
    pub(crate) children: Option<Vec<Index>>,
}

impl ColumnNode {
    pub(crate) fn level(&self) -> u8 {
        if self.parent.is_some() {
            1
        } else {
            0
        }
    }
}

/// Actions the presentation layer may offer for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnActions {
    pub add_child: bool,
    pub edit: bool,
    pub delete: bool,
    pub retype: bool,
}

/// Ordered roots, each optionally owning an ordered list of children.
///
/// Ids are unique across the whole tree. Roots have level 0, children
/// level 1; children never have children of their own.
#[derive(Debug, Clone)]
pub struct ColumnTree {
    /// Arena storage for all columns
    arena: Arena<ColumnNode>,
    /// Root sibling group, in display order
    roots: Vec<Index>,
    /// Id lookup
    index: HashMap<ColumnId, Index>,
}

impl Default for ColumnTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// A tree holding the default fixed system columns.
    pub fn seeded() -> Self {
        let mut tree = Self::new();
        for column in default_fixed_columns() {
            tree.attach(column, None);
        }
        tree
    }

    /// Build a tree from root columns, in order.
    pub fn from_roots(columns: impl IntoIterator<Item = Column>) -> TreeResult<Self> {
        let mut tree = Self::new();
        for column in columns {
            if tree.contains(&column.id) {
                return Err(DomainError::DuplicateId(column.id));
            }
            tree.attach(column, None);
        }
        Ok(tree)
    }

    // ------------------------------------------------------------
    // Mutations: each returns a new tree
    // ------------------------------------------------------------

    /// Append a new root column built from `fields`.
    ///
    /// Fixed columns only come from seeding, so a `Fixed` kind is refused.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn insert_root(
        &self,
        fields: &ColumnFields,
        ids: &mut dyn IdGenerator,
    ) -> TreeResult<(ColumnTree, ColumnId)> {
        let kind = fields.kind.unwrap_or_default();
        if kind.is_fixed() {
            warn!("fixed columns cannot be inserted as roots");
            return Err(DomainError::FixedKind);
        }

        let id = self.fresh_id(ids)?;
        let mut next = self.clone();
        next.attach(Column::new(id.clone(), fields.title.clone(), kind), None);
        debug!("inserted root {}", id);
        Ok((next, id))
    }

    /// Append a new child column under `parent_id`.
    ///
    /// Returns the unchanged tree and `None` when the parent is missing,
    /// fixed, or itself a child, or when `fields` asks for a fixed column.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn insert_child(
        &self,
        parent_id: &ColumnId,
        fields: &ColumnFields,
        ids: &mut dyn IdGenerator,
    ) -> TreeResult<(ColumnTree, Option<ColumnId>)> {
        let Some(parent_idx) = self.index.get(parent_id).copied() else {
            warn!("parent {} not found, child not inserted", parent_id);
            return Ok((self.clone(), None));
        };
        if !self.accepts_children(parent_idx) {
            warn!("parent {} does not accept children", parent_id);
            return Ok((self.clone(), None));
        }
        let kind = fields.kind.unwrap_or_default();
        if kind.is_fixed() {
            warn!("fixed columns cannot be children of {}", parent_id);
            return Ok((self.clone(), None));
        }

        let id = self.fresh_id(ids)?;
        let mut next = self.clone();
        next.attach(
            Column::new(id.clone(), fields.title.clone(), kind),
            Some(parent_idx),
        );
        debug!("inserted child {} under {}", id, parent_id);
        Ok((next, Some(id)))
    }

    /// Replace title and kind of the column `id`.
    ///
    /// Id, parent, level and children are untouched; fixed columns keep their
    /// kind. An unknown id returns an identical tree.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&self, id: &ColumnId, fields: &ColumnFields) -> ColumnTree {
        let mut next = self.clone();
        match self.index.get(id) {
            Some(&idx) => {
                if let Some(node) = next.arena.get_mut(idx) {
                    node.data.apply(fields);
                    debug!("updated {}", id);
                }
            }
            None => debug!("update of unknown column {} ignored", id),
        }
        next
    }

    /// Remove the column `id` together with its children.
    ///
    /// Removal is by id only; callers decide whether fixed columns may go.
    /// An unknown id returns an identical tree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: &ColumnId) -> ColumnTree {
        let mut next = self.clone();
        match self.index.get(id) {
            Some(&idx) => {
                let removed = next.detach(idx);
                debug!("deleted {} ({} columns)", id, removed);
            }
            None => debug!("delete of unknown column {} ignored", id),
        }
        next
    }

    /// Sort every sibling group by title, independently and stably.
    #[instrument(level = "debug", skip(self))]
    pub fn sorted(&self, direction: SortDirection) -> ColumnTree {
        let mut next = self.clone();

        let mut roots = std::mem::take(&mut next.roots);
        next.sort_group(&mut roots, direction);
        next.roots = roots;

        let parents: Vec<Index> = next
            .arena
            .iter()
            .filter(|(_, node)| node.children.is_some())
            .map(|(idx, _)| idx)
            .collect();
        for parent in parents {
            if let Some(mut group) = next.arena.get_mut(parent).and_then(|n| n.children.take()) {
                next.sort_group(&mut group, direction);
                if let Some(node) = next.arena.get_mut(parent) {
                    node.children = Some(group);
                }
            }
        }
        next
    }

    /// Sort by `direction` and hand back the direction for the next toggle.
    pub fn toggle_sort(&self, direction: SortDirection) -> (ColumnTree, SortDirection) {
        (self.sorted(direction), direction.toggled())
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: &ColumnId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &ColumnId) -> Option<ColumnView<'_>> {
        self.index.get(id).and_then(|&idx| self.view(idx))
    }

    pub fn roots(&self) -> Vec<ColumnView<'_>> {
        self.roots.iter().filter_map(|&idx| self.view(idx)).collect()
    }

    /// Children of `id`; `None` when the column is unknown or has no child list.
    pub fn children(&self, id: &ColumnId) -> Option<Vec<ColumnView<'_>>> {
        self.get(id).and_then(|view| view.children())
    }

    pub fn level(&self, id: &ColumnId) -> Option<u8> {
        self.get(id).map(|view| view.level())
    }

    /// Parent id, or [`ROOT_PARENT_ID`] for roots.
    pub fn parent_id(&self, id: &ColumnId) -> Option<&str> {
        self.get(id).map(|view| view.parent_id_str())
    }

    /// Pre-order traversal, roots left to right, each followed by its children.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels in use: 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.arena.get(idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .flatten()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// What may be done with column `id`; `None` for an unknown id.
    pub fn actions(&self, id: &ColumnId) -> Option<ColumnActions> {
        let idx = *self.index.get(id)?;
        let node = self.arena.get(idx)?;
        let fixed = node.data.kind.is_fixed();
        Some(ColumnActions {
            add_child: self.accepts_children(idx),
            edit: true,
            delete: !fixed,
            retype: !fixed,
        })
    }

    /// Nested snapshot for rendering or serialization.
    pub fn to_records(&self) -> Vec<ColumnRecord> {
        self.roots().iter().map(ColumnView::to_record).collect()
    }

    // ------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------

    fn view(&self, idx: Index) -> Option<ColumnView<'_>> {
        self.arena.get(idx).map(|node| ColumnView {
            tree: self,
            node,
        })
    }

    fn accepts_children(&self, idx: Index) -> bool {
        self.arena
            .get(idx)
            .is_some_and(|node| node.parent.is_none() && !node.data.kind.is_fixed())
    }

    #[instrument(level = "trace", skip(self, ids))]
    fn fresh_id(&self, ids: &mut dyn IdGenerator) -> TreeResult<ColumnId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ids.next_id();
            if !self.contains(&id) {
                return Ok(id);
            }
            warn!("generated id {} already in use, retrying", id);
        }
        Err(DomainError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    #[instrument(level = "trace", skip(self))]
    fn attach(&mut self, data: Column, parent: Option<Index>) -> Index {
        let id = data.id.clone();
        let node_idx = self.arena.insert(ColumnNode {
            data,
            parent,
            children: None,
        });
        self.index.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.get_or_insert_with(Vec::new).push(node_idx),
            None => self.roots.push(node_idx),
        }
        node_idx
    }

    /// Unlink `idx` from its sibling group and free its subtree.
    #[instrument(level = "trace", skip(self))]
    fn detach(&mut self, idx: Index) -> usize {
        match self.arena.get(idx).and_then(|node| node.parent) {
            Some(parent) => {
                if let Some(siblings) = self.arena.get_mut(parent).and_then(|n| n.children.as_mut())
                {
                    siblings.retain(|&sibling| sibling != idx);
                }
            }
            None => self.roots.retain(|&root| root != idx),
        }

        let doomed = self.subtree(idx);
        for &node_idx in &doomed {
            if let Some(node) = self.arena.remove(node_idx) {
                self.index.remove(&node.data.id);
            }
        }
        doomed.len()
    }

    fn subtree(&self, idx: Index) -> Vec<Index> {
        let mut collected = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.get(current) {
                collected.push(current);
                stack.extend(node.children.iter().flatten().copied());
            }
        }
        collected
    }

    fn title_key(&self, idx: Index) -> CollationKey {
        let title = self
            .arena
            .get(idx)
            .and_then(|node| node.data.title.as_deref())
            .unwrap_or("");
        CollationKey::new(title)
    }

    fn sort_group(&self, group: &mut [Index], direction: SortDirection) {
        // sort_by_cached_key is stable, so equal titles keep their order
        match direction {
            SortDirection::Ascending => group.sort_by_cached_key(|&idx| self.title_key(idx)),
            SortDirection::Descending => {
                group.sort_by_cached_key(|&idx| Reverse(self.title_key(idx)))
            }
        }
    }
}

/// Borrowed view of one column inside a tree.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    tree: &'a ColumnTree,
    node: &'a ColumnNode,
}

impl<'a> ColumnView<'a> {
    pub fn id(&self) -> &'a ColumnId {
        &self.node.data.id
    }

    pub fn title(&self) -> Option<&'a str> {
        self.node.data.title.as_deref()
    }

    pub fn kind(&self) -> ColumnKind {
        self.node.data.kind
    }

    pub fn level(&self) -> u8 {
        self.node.level()
    }

    /// Id of the owning root; `None` for roots.
    pub fn parent_id(&self) -> Option<&'a ColumnId> {
        self.node
            .parent
            .and_then(|p| self.tree.arena.get(p))
            .map(|parent| &parent.data.id)
    }

    fn parent_id_str(&self) -> &'a str {
        self.parent_id().map_or(ROOT_PARENT_ID, ColumnId::as_str)
    }

    /// Child views in order; `None` when no child list exists.
    pub fn children(&self) -> Option<Vec<ColumnView<'a>>> {
        let tree = self.tree;
        self.node
            .children
            .as_ref()
            .map(|children| children.iter().filter_map(|&idx| tree.view(idx)).collect())
    }

    pub fn to_record(&self) -> ColumnRecord {
        ColumnRecord {
            id: self.id().clone(),
            parent_id: self.parent_id_str().to_string(),
            level: self.level(),
            title: self.title().map(str::to_string),
            kind: self.kind(),
            children: self
                .children()
                .map(|children| children.iter().map(ColumnView::to_record).collect()),
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ColumnTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ColumnTree) -> Self {
        // Reverse so the first root is popped first
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = ColumnView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                for &child in node.children.iter().flatten().rev() {
                    self.stack.push(child);
                }
                return Some(ColumnView {
                    tree: self.tree,
                    node,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIds;

    #[test]
    fn given_seeded_tree_when_iterating_then_yields_fixed_roots_in_order() {
        let tree = ColumnTree::seeded();
        let ids: Vec<&str> = tree.iter().map(|v| v.id().as_str()).collect();
        assert_eq!(ids, vec!["code", "name", "remark"]);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn given_child_when_detaching_root_then_index_is_cleared() {
        let mut ids = SequentialIds::default();
        let (tree, root) = ColumnTree::new()
            .insert_root(&ColumnFields::new("a", ColumnKind::Remark), &mut ids)
            .unwrap();
        let (tree, child) = tree
            .insert_child(&root, &ColumnFields::new("b", ColumnKind::Remark), &mut ids)
            .unwrap();
        let child = child.unwrap();
        assert_eq!(tree.depth(), 2);

        let tree = tree.delete(&root);

        assert!(tree.is_empty());
        assert!(!tree.contains(&child));
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn given_duplicate_roots_when_building_then_errors() {
        let result = ColumnTree::from_roots(vec![
            Column::fixed("a", "x"),
            Column::fixed("a", "y"),
        ]);
        assert_eq!(result.unwrap_err(), DomainError::DuplicateId("a".into()));
    }

    #[test]
    fn given_preorder_when_iterating_then_children_follow_parent() {
        let mut ids = SequentialIds::default();
        let tree = ColumnTree::new();
        let (tree, a) = tree.insert_root(&ColumnFields::title("a"), &mut ids).unwrap();
        let (tree, b) = tree.insert_root(&ColumnFields::title("b"), &mut ids).unwrap();
        let (tree, _) = tree.insert_child(&a, &ColumnFields::title("a1"), &mut ids).unwrap();
        let (tree, _) = tree.insert_child(&b, &ColumnFields::title("b1"), &mut ids).unwrap();

        let titles: Vec<&str> = tree.iter().filter_map(|v| v.title()).collect();
        assert_eq!(titles, vec!["a", "a1", "b", "b1"]);
    }
}
