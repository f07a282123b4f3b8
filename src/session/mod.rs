//! The interactive timer session: the terminal stand-in for the original window and tray surface.
//! One event loop owns the timer and the log store; the one-second tick and the user's commands
//! are both served from that loop, so their ordering stays deterministic.

use std::{env, ops::ControlFlow, path::PathBuf, time::Duration};

use ansi_term::Colour;
use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    export::export_to_dir,
    store::{LogEntry, LogStore},
    timer::Timer,
    utils::clock::{Clock, DefaultClock},
};

use input::{CommandSource, SessionCommand, StdinCommandSource};

pub mod input;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Entry point for the `run` subcommand.
pub async fn run_session(app_dir: PathBuf) -> Result<()> {
    let store = LogStore::load(app_dir.join("logs.txt")).await?;

    let shutdown_token = CancellationToken::new();
    let session = Session::new(
        store,
        env::current_dir()?,
        Box::new(StdinCommandSource::new()),
        Box::new(DefaultClock),
        shutdown_token.clone(),
    );

    let (_, result) = tokio::join!(detect_shutdown(shutdown_token), session.run());
    result
}

/// Cancels the token on ctrl-c. Resolves once the token is cancelled from either side, so a
/// `quit` command also releases this task.
async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}

pub struct Session {
    timer: Timer,
    store: LogStore,
    export_dir: PathBuf,
    input: Box<dyn CommandSource>,
    clock: Box<dyn Clock>,
    shutdown: CancellationToken,
}

impl Session {
    pub fn new(
        store: LogStore,
        export_dir: PathBuf,
        input: Box<dyn CommandSource>,
        clock: Box<dyn Clock>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            timer: Timer::new(),
            store,
            export_dir,
            input,
            clock,
            shutdown,
        }
    }

    /// Executes the session event loop. The tick deadline advances by exactly one interval per
    /// delivered tick, and the `biased` ordering makes commands win over an expired tick, so no
    /// tick can land after a pause was processed.
    pub async fn run(mut self) -> Result<()> {
        println!(
            "Timer ready at {}. Type 'help' for commands.",
            self.timer.display()
        );

        let mut next_tick = self.clock.instant() + TICK_INTERVAL;
        loop {
            let flow = if self.timer.is_running() {
                select! {
                    biased;
                    _ = self.shutdown.cancelled() => ControlFlow::Break(()),
                    command = self.input.next_command() => self.handle_input(command).await?,
                    _ = self.clock.sleep_until(next_tick) => {
                        next_tick += TICK_INTERVAL;
                        self.timer.tick();
                        self.print_display();
                        ControlFlow::Continue(())
                    }
                }
            } else {
                select! {
                    biased;
                    _ = self.shutdown.cancelled() => ControlFlow::Break(()),
                    command = self.input.next_command() => {
                        let flow = self.handle_input(command).await?;
                        if self.timer.is_running() {
                            // Just started, the first tick lands one interval from now.
                            next_tick = self.clock.instant() + TICK_INTERVAL;
                        }
                        flow
                    }
                }
            };

            if flow.is_break() {
                break;
            }
        }

        self.shutdown.cancel();
        Ok(())
    }

    async fn handle_input(&mut self, command: Option<SessionCommand>) -> Result<ControlFlow<()>> {
        // A closed input ends the session the same way quit does.
        let Some(command) = command else {
            return Ok(ControlFlow::Break(()));
        };

        debug!("Handling command {:?}", command);
        match command {
            SessionCommand::Toggle => {
                self.timer.toggle();
                if self.timer.is_running() {
                    println!("Timer running.");
                } else {
                    println!("Paused at {}.", self.timer.display());
                }
            }
            SessionCommand::Reset => {
                if self.timer.reset() {
                    self.print_display();
                } else {
                    println!("Pause the timer before resetting.");
                }
            }
            SessionCommand::AddLog { title } => self.add_log(title).await?,
            SessionCommand::ShowLogs => self.print_logs(),
            SessionCommand::Export => match export_to_dir(&self.store, &self.export_dir).await? {
                Some(path) => println!("Exported logs to {}.", path.display()),
                None => println!("No logs to export."),
            },
            SessionCommand::Help => print_help(),
            SessionCommand::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Records the measured time under the given title and resets the timer. The guards mirror
    /// the original controls: adding is unavailable mid-run and with nothing measured, and a
    /// title the line format can't hold is refused with a notice.
    async fn add_log(&mut self, title: String) -> Result<()> {
        if self.timer.is_running() {
            println!("Pause the timer before adding a log.");
            return Ok(());
        }
        if self.timer.elapsed_seconds() == 0 {
            println!("Nothing measured yet.");
            return Ok(());
        }
        let title = title.trim().to_string();
        if let Err(notice) = LogEntry::validate_title(&title) {
            println!("{notice}");
            return Ok(());
        }

        let entry = LogEntry {
            timestamp: self.clock.time().naive_local(),
            title,
            duration: chrono::Duration::seconds(self.timer.elapsed_seconds() as i64),
        };
        self.store.append(&entry).await?;
        self.timer.reset();
        println!("Added log: {}", entry.compose_line());
        Ok(())
    }

    fn print_logs(&self) {
        if self.store.is_empty() {
            println!("No logs recorded.");
            return;
        }
        for (number, line) in self.store.lines().iter().enumerate() {
            println!("{:>3}  {line}", number + 1);
        }
    }

    fn print_display(&self) {
        let display = self.timer.display();
        if self.timer.is_running() {
            // The original paints the label blue while the timer runs.
            println!("{}", Colour::Cyan.paint(display));
        } else {
            println!("{display}");
        }
    }
}

fn print_help() {
    println!(
        "start | pause  toggle the timer\n\
         reset          set the timer back to 0:00:00 (while paused)\n\
         add <title>    record the measured time under '<project> <version>'\n\
         logs           list recorded entries\n\
         export         write the markdown report into the current directory\n\
         quit           leave the session"
    );
}
