use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDateTime};

use crate::utils::time::{format_clock, parse_clock, ENTRY_TIMESTAMP_FORMAT};

/// Separator between the timestamp, title and duration fields of a stored line. The format has no
/// escaping, so a title containing this sequence would corrupt the line; [LogEntry::validate_title]
/// refuses such titles up front.
pub const FIELD_DELIMITER: &str = " - ";

/// One recorded observation: when it was logged, what the user called it, and how long the timer
/// ran. Stored as a single `"<timestamp> - <title> - <H:MM:SS>"` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub title: String,
    pub duration: Duration,
}

impl LogEntry {
    /// Serializes the entry into its on-disk line form.
    pub fn compose_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.timestamp.format(ENTRY_TIMESTAMP_FORMAT),
            self.title,
            format_clock(self.duration.num_seconds()),
        )
    }

    /// Parses a stored line back into an entry. Lines that don't follow the
    /// timestamp/title/duration shape are reported with the offending line included, since they
    /// only surface later, during export.
    pub fn parse_line(line: &str) -> Result<LogEntry> {
        let mut fields = line.splitn(3, FIELD_DELIMITER);
        let (Some(timestamp), Some(title), Some(duration)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(anyhow!("log line '{line}' is missing a '{FIELD_DELIMITER}' delimiter"));
        };

        let timestamp = NaiveDateTime::parse_from_str(timestamp, ENTRY_TIMESTAMP_FORMAT)
            .with_context(|| format!("log line '{line}' has an unreadable timestamp"))?;
        let duration = parse_clock(duration)
            .with_context(|| format!("log line '{line}' has an unreadable duration"))?;

        Ok(LogEntry {
            timestamp,
            title: title.to_string(),
            duration,
        })
    }

    /// Splits the title into the project token and the version remainder, the way export grouping
    /// reads it.
    pub fn project_and_version(&self) -> Result<(&str, &str)> {
        self.title
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("title '{}' has no version after the project name", self.title))
    }

    /// Checks that a user-supplied title can round-trip through the line format and export
    /// grouping. Returns a user-facing complaint when it can't.
    pub fn validate_title(title: &str) -> Result<(), &'static str> {
        if title.trim().is_empty() {
            return Err("Enter a log title first.");
        }
        if title.contains(FIELD_DELIMITER) {
            return Err("Titles can't contain ' - ', it separates the stored fields.");
        }
        if title.trim().split_whitespace().count() < 2 {
            return Err("Use a '<project> <version>' title, for example 'timekeep v0.1'.");
        }
        Ok(())
    }
}
