//! Command-line runner for the description-list editor.
//!
//! Usage:
//!   deflist `<FILE>` [STEP...] [--write] [--states] [--json] [--config `<PATH>`] [-v]
//!
//! Steps are `enter`, `undo`, `redo` or a command name (`descriptionList`,
//! `descriptionTerm`, `descriptionValue`), applied in order to the selection
//! marked in the file.

use anyhow::{Context, Result};
use clap::Parser;
use deflist_config::Config;
use deflist_engine::{Command, CommandStates, EditOptions, EditSession, io};
use relative_path::RelativePathBuf;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Apply description-list editing steps to a markup document
#[derive(Parser, Debug)]
#[command(name = "deflist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markup document; relative paths are resolved against `documents_path`
    file: PathBuf,

    /// Steps to apply in order
    steps: Vec<Step>,

    /// Write the result back to the file (without selection markers)
    #[arg(short, long)]
    write: bool,

    /// Print the command states for the final selection
    #[arg(short, long)]
    states: bool,

    /// Print a JSON report instead of plain markup
    #[arg(long)]
    json: bool,

    /// Config file to use instead of ~/.config/deflist/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Enter,
    Undo,
    Redo,
    Exec(Command),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enter" => Ok(Step::Enter),
            "undo" => Ok(Step::Undo),
            "redo" => Ok(Step::Redo),
            name => name.parse().map(Step::Exec).map_err(|_| {
                format!(
                    "unknown step '{name}', expected enter, undo, redo, {}",
                    Command::ALL.map(Command::name).join(", ")
                )
            }),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Enter => f.write_str("enter"),
            Step::Undo => f.write_str("undo"),
            Step::Redo => f.write_str("redo"),
            Step::Exec(command) => write!(f, "{command}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    markup: String,
    version: u64,
    undo_depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    states: Option<CommandStates>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

fn init_logging(verbose: bool, config: &Config) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if let Some(filters) = &config.log_level {
        builder.parse_filters(filters);
    }
    // RUST_LOG still wins over both.
    builder.parse_default_env().init();
}

fn edit_options(config: &Config) -> EditOptions {
    let defaults = EditOptions::default();
    EditOptions {
        fillers: config.fillers.clone().unwrap_or(defaults.fillers),
        history_limit: config.history_limit.unwrap_or(defaults.history_limit),
    }
}

/// Split a document path into the directory and file name the io layer works with.
fn split_document_path(path: &Path) -> Result<(PathBuf, RelativePathBuf)> {
    let name = path
        .file_name()
        .with_context(|| format!("{} is not a file path", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let relative = RelativePathBuf::from_path(name)
        .with_context(|| format!("{} is not a valid file name", path.display()))?;
    Ok((dir.to_path_buf(), relative))
}

fn apply(session: &mut EditSession, step: Step) -> Result<()> {
    let applied = match step {
        Step::Enter => session.enter()?.is_some(),
        Step::Undo => session.undo(),
        Step::Redo => session.redo(),
        Step::Exec(command) => session.exec(command)?.is_some(),
    };
    if !applied {
        log::info!("{step}: no change");
    }
    Ok(())
}

fn render_states(states: &CommandStates) -> String {
    Command::ALL
        .iter()
        .map(|&command| format!("{command}: {}", states.get(command)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the steps and return what should be printed.
fn run(cli: &Cli, config: &Config) -> Result<String> {
    let path = config.resolve_document(&cli.file);
    let (dir, relative) = split_document_path(&path)?;
    log::debug!("opening {}", path.display());

    let mut session = io::open_session(&relative, &dir, edit_options(config))?;
    for &step in &cli.steps {
        apply(&mut session, step).with_context(|| format!("step '{step}' failed"))?;
    }

    if cli.write {
        io::save_session(&session, &relative, &dir)?;
        log::info!("wrote {}", path.display());
    }

    let states = if cli.states {
        Some(session.states()?)
    } else {
        None
    };

    if cli.json {
        let report = Report {
            markup: session.to_markup(),
            version: session.version(),
            undo_depth: session.undo_depth(),
            states,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut output = session.to_markup();
    if let Some(states) = states {
        output.push('\n');
        output.push_str(&render_states(&states));
    }
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config);
    log::debug!("config: {config:?}");

    println!("{}", run(&cli, &config)?);
    Ok(())
}
