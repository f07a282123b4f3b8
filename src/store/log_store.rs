use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::debug;

use super::entry::LogEntry;

/// The in-memory log with its backing file. The sequence is order-preserving, duplicates are
/// allowed, and entries are identified by their exact line text. Every mutation rewrites or
/// appends to the file immediately, so the file is always the newline-joined serialization of
/// the sequence.
pub struct LogStore {
    path: PathBuf,
    lines: Vec<String>,
}

impl LogStore {
    /// Reads the backing file into memory. A missing file is an empty log; every other I/O error
    /// surfaces to the caller.
    pub async fn load(path: PathBuf) -> Result<Self> {
        let lines = match File::open(&path).await {
            Ok(file) => {
                debug!("Loading log entries from {:?}", path);
                let mut reader = BufReader::new(file).lines();
                let mut lines = vec![];
                while let Some(line) = reader.next_line().await? {
                    let line = line.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                }
                lines
            }
            Err(e) if e.kind() == ErrorKind::NotFound => vec![],
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open log file {path:?}"))
            }
        };

        Ok(Self { path, lines })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds an entry to the end of the log and appends its line to the backing file.
    pub async fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = entry.compose_line();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open log file {:?}", self.path))?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;

        self.lines.push(line);
        Ok(())
    }

    /// Removes the first entry whose line text matches exactly, then rewrites the whole backing
    /// file. Returns false when nothing matched, which leaves both states untouched.
    pub async fn remove(&mut self, line: &str) -> Result<bool> {
        let Some(position) = self.lines.iter().position(|v| v == line) else {
            return Ok(false);
        };
        self.lines.remove(position);
        self.rewrite().await?;
        Ok(true)
    }

    /// Empties the log and truncates the backing file.
    pub async fn clear(&mut self) -> Result<()> {
        self.lines.clear();
        self.rewrite().await
    }

    async fn rewrite(&self) -> Result<()> {
        let mut contents = self.lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to rewrite log file {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    use crate::store::entry::LogEntry;

    use super::LogStore;

    fn timestamp(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn entry(day: u32, title: &str, seconds: i64) -> LogEntry {
        LogEntry {
            timestamp: timestamp(day, 10),
            title: title.to_string(),
            duration: Duration::seconds(seconds),
        }
    }

    #[tokio::test]
    async fn append_then_reload_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs.txt");

        let mut store = LogStore::load(path.clone()).await?;
        assert!(store.is_empty());

        store.append(&entry(1, "alpha v1", 10)).await?;
        store.append(&entry(2, "alpha v1", 20)).await?;
        store.append(&entry(2, "beta v2", 30)).await?;

        let reloaded = LogStore::load(path).await?;
        assert_eq!(reloaded.lines(), store.lines());
        assert_eq!(reloaded.lines().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn remove_restores_the_pre_append_state() -> Result<()> {
        let dir = tempdir()?;
        let mut store = LogStore::load(dir.path().join("logs.txt")).await?;

        store.append(&entry(1, "alpha v1", 10)).await?;
        let before = store.lines().to_vec();

        let added = entry(2, "beta v2", 20);
        store.append(&added).await?;
        assert!(store.remove(&added.compose_line()).await?);

        assert_eq!(store.lines(), before);
        let reloaded = LogStore::load(store.path().to_path_buf()).await?;
        assert_eq!(reloaded.lines(), before);
        Ok(())
    }

    #[tokio::test]
    async fn remove_of_missing_entry_is_a_no_op() -> Result<()> {
        let dir = tempdir()?;
        let mut store = LogStore::load(dir.path().join("logs.txt")).await?;
        store.append(&entry(1, "alpha v1", 10)).await?;

        assert!(!store.remove("2024-01-09 10:00:00 - ghost v0 - 0:00:01").await?);
        assert_eq!(store.lines().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicates_are_kept_and_removed_one_at_a_time() -> Result<()> {
        let dir = tempdir()?;
        let mut store = LogStore::load(dir.path().join("logs.txt")).await?;

        let duplicated = entry(1, "alpha v1", 10);
        store.append(&duplicated).await?;
        store.append(&duplicated).await?;
        assert_eq!(store.lines().len(), 2);

        assert!(store.remove(&duplicated.compose_line()).await?);
        assert_eq!(store.lines().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn clear_then_reload_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs.txt");
        let mut store = LogStore::load(path.clone()).await?;

        store.append(&entry(1, "alpha v1", 10)).await?;
        store.append(&entry(2, "beta v2", 20)).await?;
        store.clear().await?;

        assert!(store.is_empty());
        let reloaded = LogStore::load(path).await?;
        assert!(reloaded.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn load_trims_whitespace_and_skips_blank_lines() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs.txt");
        tokio::fs::write(
            &path,
            "2024-01-01 10:00:00 - alpha v1 - 0:00:10  \n\n  2024-01-02 10:00:00 - beta v2 - 0:00:20\n",
        )
        .await?;

        let store = LogStore::load(path).await?;
        assert_eq!(
            store.lines(),
            [
                "2024-01-01 10:00:00 - alpha v1 - 0:00:10",
                "2024-01-02 10:00:00 - beta v2 - 0:00:20",
            ]
        );
        Ok(())
    }
}
