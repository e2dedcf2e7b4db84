//! Command dispatch for the coltree binary

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ColumnSession;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::render::{self, ViewFormat};
use crate::cli::script::{run_script, Reply};
use crate::cli::{output, CliError, CliResult};
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.color {
        output::disable_colors();
    }

    match &cli.command {
        Some(Commands::Show { json, tree }) => {
            _show(&settings, ViewFormat::from_flags(*json, *tree))
        }
        Some(Commands::Run { script }) => _run(&settings, script.as_deref()),
        Some(Commands::Config { command }) => _config(&settings, cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, format: ViewFormat) -> CliResult<()> {
    let session = ColumnSession::new(settings);
    output::info(&render::render(session.tree(), format)?);
    Ok(())
}

#[instrument(skip(settings))]
fn _run(settings: &Settings, script: Option<&Path>) -> CliResult<()> {
    let mut session = ColumnSession::new(settings);
    let applied = match script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| CliError::io(format!("open script {}", path.display()), e))?;
            run_script(&mut session, BufReader::new(file), print_reply)?
        }
        None => run_script(&mut session, io::stdin().lock(), print_reply)?,
    };
    debug!("script applied {} commands", applied);

    output::header("Schema");
    output::info(&render::render_table(session.tree()));
    Ok(())
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Created {
            id,
            parent_id: Some(parent),
        } => output::action("Created", &format!("{id} under {parent}")),
        Reply::Created { id, parent_id: None } => output::action("Created", id),
        Reply::Updated { id, matched: true } => output::action("Updated", id),
        Reply::Updated { id, matched: false } => {
            output::warning(&format!("column {id} not found, nothing updated"))
        }
        Reply::Deleted { id, removed: true } => output::action("Deleted", id),
        Reply::Deleted { id, removed: false } => {
            output::warning(&format!("column {id} not found, nothing deleted"))
        }
        Reply::Sorted(outcome) => {
            output::success(&format!("sort order switched to {}", outcome.next))
        }
        Reply::View(text) => output::info(text),
    }
}

fn _config(settings: &Settings, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)
                    .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
            }
            fs::write(&path, Settings::template())
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info("global: <unavailable>"),
            }
            if let Some(path) = &cli.config {
                output::info(&format!("explicit: {}", path.display()));
            }
            Ok(())
        }
    }
}
