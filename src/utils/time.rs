use anyhow::{anyhow, Result};
use chrono::Duration;

/// This is the standard way of printing timestamps inside log entries.
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a whole-second count the way the timer display shows it:
/// hours unpadded, minutes and seconds zero-padded to two digits.
pub fn format_clock(total_seconds: i64) -> String {
    format!(
        "{}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60
    )
}

/// Parses an `H:MM:SS` string back into a duration.
pub fn parse_clock(value: &str) -> Result<Duration> {
    let mut parts = value.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(anyhow!("'{value}' is not an H:MM:SS duration"));
    };
    let hours = hours.parse::<i64>()?;
    let minutes = minutes.parse::<i64>()?;
    let seconds = seconds.parse::<i64>()?;
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(anyhow!("'{value}' is not an H:MM:SS duration"));
    }
    Ok(Duration::seconds(hours * 3600 + minutes * 60 + seconds))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{format_clock, parse_clock};

    #[test]
    fn format_follows_display_math() {
        assert_eq!(format_clock(0), "0:00:00");
        assert_eq!(format_clock(59), "0:00:59");
        assert_eq!(format_clock(60), "0:01:00");
        assert_eq!(format_clock(3661), "1:01:01");
        assert_eq!(format_clock(36_000 + 59 * 60 + 59), "10:59:59");
    }

    #[test]
    fn parse_accepts_what_format_produces() {
        for seconds in [0, 1, 59, 60, 3599, 3600, 3661, 86_400 + 61] {
            assert_eq!(
                parse_clock(&format_clock(seconds)).unwrap(),
                Duration::seconds(seconds)
            );
        }
    }

    #[test]
    fn parse_rejects_malformed_values() {
        for value in ["", "1:2", "1:02:03:04", "0:60:00", "0:00:61", "a:00:00"] {
            assert!(parse_clock(value).is_err(), "{value} should not parse");
        }
    }
}
