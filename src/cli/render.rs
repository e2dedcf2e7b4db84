//! Schema rendering: table, tree and JSON views of a column tree

use comfy_table::Table;
use itertools::Itertools;
use termtree::Tree;

use crate::cli::{CliError, CliResult};
use crate::domain::{ColumnTree, ColumnView};

/// Output format for a schema view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFormat {
    #[default]
    Table,
    Tree,
    Json,
}

impl ViewFormat {
    pub fn from_flags(json: bool, tree: bool) -> Self {
        if json {
            Self::Json
        } else if tree {
            Self::Tree
        } else {
            Self::Table
        }
    }
}

pub fn render(tree: &ColumnTree, format: ViewFormat) -> CliResult<String> {
    match format {
        ViewFormat::Table => Ok(render_table(tree)),
        ViewFormat::Tree => Ok(tree.to_tree_string().to_string()),
        ViewFormat::Json => render_json(tree),
    }
}

/// One row per column in display order; children are indented under their root.
pub fn render_table(tree: &ColumnTree) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Title", "Type", "Id", "Actions"]);

    for view in tree.iter() {
        let title = view.title().unwrap_or_default();
        let title = if view.level() > 0 {
            format!("  └ {title}")
        } else {
            title.to_string()
        };
        table.add_row(vec![
            title,
            view.kind().label().to_string(),
            view.id().to_string(),
            action_names(tree, &view),
        ]);
    }
    table.to_string()
}

fn action_names(tree: &ColumnTree, view: &ColumnView<'_>) -> String {
    let Some(actions) = tree.actions(view.id()) else {
        return String::new();
    };
    [
        (actions.add_child, "new-child"),
        (actions.edit, "edit"),
        (actions.delete, "delete"),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, name)| *name)
    .join(" ")
}

pub fn render_json(tree: &ColumnTree) -> CliResult<String> {
    serde_json::to_string_pretty(&tree.to_records())
        .map_err(|e| CliError::Internal(format!("serialize schema: {e}")))
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn node_label(view: &ColumnView<'_>) -> String {
    format!(
        "{} [{}] ({})",
        view.title().unwrap_or_default(),
        view.kind(),
        view.id()
    )
}

impl TreeNodeConvert for ColumnView<'_> {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .children()
            .unwrap_or_default()
            .iter()
            .map(|child| child.to_tree_string())
            .collect();
        Tree::new(node_label(self)).with_leaves(leaves)
    }
}

impl TreeNodeConvert for ColumnTree {
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty schema".to_string());
        }
        let leaves: Vec<_> = self.roots().iter().map(|r| r.to_tree_string()).collect();
        Tree::new("columns".to_string()).with_leaves(leaves)
    }
}
