use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    export::export_to_dir,
    session::run_session,
    store::LogStore,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Timekeep", version, long_about = None)]
#[command(about = "Stopwatch time tracker with plain-text logs and markdown export", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Run an interactive timer session. The timer prints its display every second; type 'help' inside the session for commands"
    )]
    Run {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Print recorded log entries with their numbers")]
    Logs {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Remove one log entry by its number in the logs output")]
    Remove {
        #[arg(help = "Entry number as shown by the logs command")]
        number: usize,
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Remove every log entry")]
    Clear {
        #[arg(long, help = "Confirm clearing. Without it nothing is removed")]
        yes: bool,
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Write a markdown report of all entries grouped by project and version")]
    Export {
        #[arg(
            long,
            help = "Directory to place the report into. Defaults to the current directory"
        )]
        out: Option<PathBuf>,
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
}

impl Commands {
    fn dir(&self) -> Option<PathBuf> {
        match self {
            Commands::Run { dir }
            | Commands::Logs { dir }
            | Commands::Remove { dir, .. }
            | Commands::Clear { dir, .. }
            | Commands::Export { dir, .. } => dir.clone(),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .commands
        .dir()
        .map_or_else(create_application_default_path, Ok)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let log_file = app_dir.join("logs.txt");
    match args.commands {
        Commands::Run { .. } => run_session(app_dir).await,
        Commands::Logs { .. } => {
            let store = LogStore::load(log_file).await?;
            if store.is_empty() {
                println!("No logs recorded.");
            } else {
                for (number, line) in store.lines().iter().enumerate() {
                    println!("{:>3}  {line}", number + 1);
                }
            }
            Ok(())
        }
        Commands::Remove { number, .. } => {
            if number == 0 {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        "Entry numbers start at 1",
                    )
                    .into());
            }
            let mut store = LogStore::load(log_file).await?;
            let Some(line) = store.lines().get(number - 1).cloned() else {
                println!("No log entry with number {number}.");
                return Ok(());
            };
            store.remove(&line).await?;
            println!("Removed log: {line}");
            Ok(())
        }
        Commands::Clear { yes, .. } => {
            if !yes {
                println!("This removes every log entry. Pass --yes to confirm.");
                return Ok(());
            }
            let mut store = LogStore::load(log_file).await?;
            store.clear().await?;
            println!("Cleared all logs.");
            Ok(())
        }
        Commands::Export { out, .. } => {
            let store = LogStore::load(log_file).await?;
            let out = out.map_or_else(env::current_dir, Ok)?;
            match export_to_dir(&store, &out).await? {
                Some(path) => println!("Exported logs to {}.", path.display()),
                None => println!("No logs to export."),
            }
            Ok(())
        }
    }
}
