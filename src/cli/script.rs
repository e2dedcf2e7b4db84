//! Session scripts: one editing command per line
//!
//! ```text
//! # comment
//! new "Unit price" --kind user-fill
//! child name 子列A --kind customize
//! edit code "No."
//! delete 1718000000000
//! sort
//! show --tree
//! ```

use std::io::BufRead;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::application::{ColumnForm, ColumnSession, SortOutcome};
use crate::cli::render::{self, ViewFormat};
use crate::cli::{CliError, CliResult};
use crate::domain::{ColumnId, ColumnKind};

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct ScriptLine {
    #[command(subcommand)]
    command: SessionCommand,
}

/// Commands accepted in a session script.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Create a root column
    New {
        title: String,
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ColumnKind>,
    },

    /// Create a child column
    Child {
        parent: String,
        title: String,
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ColumnKind>,
    },

    /// Rename or retype a column
    Edit {
        id: String,
        title: String,
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ColumnKind>,
    },

    /// Delete a column and its children
    Delete { id: String },

    /// Toggle the title sort
    Sort,

    /// Print the current schema
    Show {
        #[arg(long, conflicts_with = "tree")]
        json: bool,
        #[arg(long)]
        tree: bool,
    },
}

fn parse_kind(value: &str) -> Result<ColumnKind, String> {
    value.parse().map_err(|e: crate::domain::ParseKindError| e.to_string())
}

/// What a command did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Created {
        id: ColumnId,
        parent_id: Option<ColumnId>,
    },
    Updated { id: ColumnId, matched: bool },
    Deleted { id: ColumnId, removed: bool },
    Sorted(SortOutcome),
    View(String),
}

/// Split a line into words with shell quoting rules.
pub fn split_words(line: &str) -> CliResult<Vec<String>> {
    shell_words::split(line)
        .map_err(|e| CliError::InvalidArgs(format!("failed to parse line: {e}")))
}

/// Parse one script line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> CliResult<Option<SessionCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = split_words(trimmed)?;
    let parsed = ScriptLine::try_parse_from(words).map_err(|e| {
        let rendered = e.to_string();
        let message = rendered.lines().next().unwrap_or_default();
        CliError::InvalidArgs(message.trim_start_matches("error: ").to_string())
    })?;
    Ok(Some(parsed.command))
}

/// Apply one command to the session.
pub fn apply(session: &mut ColumnSession, command: SessionCommand) -> CliResult<Reply> {
    debug!("apply: {:?}", command);
    let reply = match command {
        SessionCommand::New { title, kind } => Reply::Created {
            id: session.add_root(&ColumnForm::new(title, kind))?,
            parent_id: None,
        },
        SessionCommand::Child {
            parent,
            title,
            kind,
        } => {
            let parent = ColumnId::from(parent);
            let id = session.add_child(&parent, &ColumnForm::new(title, kind))?;
            Reply::Created {
                id,
                parent_id: Some(parent),
            }
        }
        SessionCommand::Edit { id, title, kind } => {
            let id = ColumnId::from(id);
            // An omitted --kind keeps the current one
            let kind = kind.or_else(|| {
                session
                    .tree()
                    .get(&id)
                    .and_then(|view| ColumnForm::prefill(&view).kind)
            });
            let matched = session.edit(&id, &ColumnForm::new(title, kind))?;
            Reply::Updated { id, matched }
        }
        SessionCommand::Delete { id } => {
            let id = ColumnId::from(id);
            let removed = session.delete(&id)?;
            Reply::Deleted { id, removed }
        }
        SessionCommand::Sort => Reply::Sorted(session.toggle_sort()),
        SessionCommand::Show { json, tree } => Reply::View(render::render(
            session.tree(),
            ViewFormat::from_flags(json, tree),
        )?),
    };
    Ok(reply)
}

/// Run every line of `reader` against the session, stopping at the first error.
///
/// `on_reply` receives each reply as it is produced. Returns the number of
/// commands applied.
pub fn run_script<R: BufRead>(
    session: &mut ColumnSession,
    reader: R,
    mut on_reply: impl FnMut(&Reply),
) -> CliResult<usize> {
    let mut applied = 0;
    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line.map_err(|e| CliError::io(format!("read script line {line_no}"), e))?;
        let wrap = |source: CliError| CliError::Script {
            line: line_no,
            source: Box::new(source),
        };

        let Some(command) = parse_line(&line).map_err(wrap)? else {
            continue;
        };
        let reply = apply(session, command).map_err(wrap)?;
        on_reply(&reply);
        applied += 1;
    }
    Ok(applied)
}
