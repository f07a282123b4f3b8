use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::error;

/// A user action inside a running session. These are the four core entry points plus the
/// read-only conveniences the original exposed through its menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// The dual-purpose start/pause control.
    Toggle,
    Reset,
    AddLog { title: String },
    ShowLogs,
    Export,
    Help,
    Quit,
}

/// Intended to serve as a contract for where session commands come from. Cut here so tests can
/// script a session without a terminal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandSource: Send {
    /// Returns the next command, or None once the input is closed.
    async fn next_command(&mut self) -> Option<SessionCommand>;
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "start" | "pause" | "toggle" => Ok(SessionCommand::Toggle),
        "reset" => Ok(SessionCommand::Reset),
        "add" => Ok(SessionCommand::AddLog {
            title: rest.to_string(),
        }),
        "logs" => Ok(SessionCommand::ShowLogs),
        "export" => Ok(SessionCommand::Export),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
        other => Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    }
}

/// Reads line commands from the terminal. Unrecognized lines get a notice and the source keeps
/// reading, so the session loop only ever sees valid commands.
pub struct StdinCommandSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinCommandSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinCommandSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSource for StdinCommandSource {
    async fn next_command(&mut self) -> Option<SessionCommand> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    error!("Failed to read from stdin {e:?}");
                    return None;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Ok(command) => return Some(command),
                Err(notice) => println!("{notice}"),
            }
        }
    }
}
