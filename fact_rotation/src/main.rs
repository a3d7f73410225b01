//! CLI binary for fact rotation.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fact_rotation::{
    FactSession, RotationConfig, RotationOutcome, TerminalPresenter, Trigger,
};
use std::collections::HashSet;
use std::io::{self, BufRead, Stdout};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Show a not-yet-seen fact from the catalog, cycling through all of them.
#[derive(Parser)]
#[command(name = "fact-rotation", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of JSON fact files (overrides the config).
    #[arg(long)]
    facts_dir: Option<PathBuf>,

    /// State file tracking shown facts (overrides the config).
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Print the detailed description too.
    #[arg(long)]
    details: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Show one fact now.
    Show,

    /// Report opened files; shows a fact if any has a watched extension.
    Open {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Read triggers from stdin, one per line: `show`, `open PATH`, `create PATH...`.
    Watch,

    /// Print how many facts have been shown this cycle.
    Status,

    /// Forget shown facts and start a new cycle.
    Reset,

    /// List every fact, marking the ones already shown.
    List,
}

type Session = FactSession<fact_rotation::JsonFileStore, TerminalPresenter<Stdout>>;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only facts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fact_rotation=info,fact_catalog=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = RotationConfig::load(cli.config.as_deref()).context("loading config")?;
    if cli.facts_dir.is_some() {
        config.facts_dir = cli.facts_dir;
    }
    if cli.state_file.is_some() {
        config.state_file = cli.state_file;
    }
    if cli.details {
        config.show_details = true;
    }

    let presenter = TerminalPresenter::new(io::stdout(), config.notification_label.clone())
        .with_details(config.show_details)
        .with_detail_file(config.detail_file.clone());
    let mut session = Session::from_config(&config, presenter);

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            report(session.handle(&Trigger::Manual, Instant::now()));
        }
        Command::Open { paths } => {
            if session.open_files(paths, Instant::now()).is_none() {
                println!("No watched files; nothing to show.");
            }
        }
        Command::Watch => run_watch(&mut session)?,
        Command::Status => {
            let rotator = session.rotator();
            let shown = rotator.tracker().shown().context("reading shown facts")?;
            println!(
                "{} of {} facts shown this cycle",
                shown.len(),
                rotator.catalog().len()
            );
        }
        Command::Reset => {
            session
                .rotator_mut()
                .tracker_mut()
                .reset()
                .context("resetting shown facts")?;
            println!("Shown facts cleared.");
        }
        Command::List => {
            let rotator = session.rotator();
            let shown: HashSet<_> = rotator
                .tracker()
                .shown()
                .context("reading shown facts")?
                .into_iter()
                .collect();
            for fact in rotator.catalog().iter() {
                let mark = if shown.contains(&fact.id) { "x" } else { " " };
                println!("[{mark}] {}  {}", fact.id, fact.title);
            }
        }
    }

    Ok(())
}

/// Serve trigger lines from stdin until EOF.
fn run_watch(session: &mut Session) -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Trigger>() {
            Ok(trigger) => {
                if let Some(outcome) = session.handle(&trigger, Instant::now()) {
                    report(Some(outcome));
                }
            }
            Err(err) => warn!(line = %line, error = %err, "ignoring trigger line"),
        }
    }

    session.presenter_mut().close_detail();
    Ok(())
}

fn report(outcome: Option<RotationOutcome>) {
    match outcome {
        Some(RotationOutcome::Selected(selection)) => {
            if selection.recorded.is_err() {
                eprintln!("warning: could not record that this fact was shown");
            }
        }
        Some(RotationOutcome::NothingToShow) => println!("No facts available."),
        None => {}
    }
}
