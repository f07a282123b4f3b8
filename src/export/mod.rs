//! Turns the stored log lines into a grouped markdown report: entries are grouped by project,
//! then by version, with summed durations at every level.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::{
    store::{LogEntry, LogStore},
    utils::time::{format_clock, ENTRY_TIMESTAMP_FORMAT},
};

/// All entries recorded under one version of a project, in insertion order, with their summed
/// duration.
#[derive(Debug)]
pub struct VersionGroup {
    pub version: String,
    pub entries: Vec<LogEntry>,
    pub total: Duration,
}

#[derive(Debug)]
pub struct ProjectGroup {
    pub project: String,
    pub versions: Vec<VersionGroup>,
    pub total: Duration,
}

/// The derived report: projects sorted lexicographically, a grand total across all of them.
/// Recomputed from the log on every export, never persisted.
#[derive(Debug)]
pub struct Report {
    pub projects: Vec<ProjectGroup>,
    pub total: Duration,
}

impl Report {
    /// Date range used in the report header and the file name. This reads the first entry of the
    /// first sorted project and the last entry of the *first* version group of the last sorted
    /// project, matching what the app always did. It is not a chronological min/max; the
    /// `filename_follows_sorted_group_bounds` test pins the difference.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        let first = &self.projects[0].versions[0].entries[0];
        let last_project = &self.projects[self.projects.len() - 1];
        let last_versions = &last_project.versions[0].entries;
        let last = &last_versions[last_versions.len() - 1];
        (first.timestamp.date(), last.timestamp.date())
    }

    pub fn file_name(&self) -> String {
        let (start, end) = self.date_bounds();
        format!("logs_{start}-{end}.md")
    }
}

/// Groups the stored lines by project, then by version. Projects come out sorted by name;
/// versions and entries keep their encounter order. Returns None for an empty log. A line that
/// doesn't parse fails the whole export, naming the line.
pub fn aggregate(lines: &[String]) -> Result<Option<Report>> {
    if lines.is_empty() {
        return Ok(None);
    }

    let mut projects = BTreeMap::<String, Vec<(String, Vec<LogEntry>)>>::new();
    for line in lines {
        let entry = LogEntry::parse_line(line)?;
        let (project, version) = entry.project_and_version()?;
        let (project, version) = (project.to_string(), version.to_string());

        let versions = projects.entry(project).or_default();
        match versions.iter_mut().find(|(name, _)| *name == version) {
            Some((_, entries)) => entries.push(entry),
            None => versions.push((version, vec![entry])),
        }
    }

    let mut total = Duration::zero();
    let projects = projects
        .into_iter()
        .map(|(project, versions)| {
            let versions = versions
                .into_iter()
                .map(|(version, entries)| {
                    let version_total = entries
                        .iter()
                        .fold(Duration::zero(), |sum, e| sum + e.duration);
                    VersionGroup {
                        version,
                        entries,
                        total: version_total,
                    }
                })
                .collect::<Vec<_>>();
            let project_total = versions
                .iter()
                .fold(Duration::zero(), |sum, v| sum + v.total);
            total += project_total;
            ProjectGroup {
                project,
                versions,
                total: project_total,
            }
        })
        .collect();

    Ok(Some(Report { projects, total }))
}

pub fn render_markdown(report: &Report) -> String {
    let (start, end) = report.date_bounds();
    let mut out = format!("# Time log entries from {start} to {end}\n\n");

    for project in &report.projects {
        out += &format!("## Project name: {}\n\n", project.project);
        for version in &project.versions {
            out += &format!("### Version: {}\n\n", version.version);
            for entry in &version.entries {
                out += &format!(
                    "- **{}**: {} - {}\n",
                    entry.timestamp.format(ENTRY_TIMESTAMP_FORMAT),
                    entry.title,
                    format_clock(entry.duration.num_seconds()),
                );
            }
            out += &format!(
                "\nVersion total: {}\n\n",
                format_clock(version.total.num_seconds())
            );
        }
        out += &format!(
            "### Total time logged for {}: {}\n\n",
            project.project,
            format_clock(project.total.num_seconds())
        );
    }

    out += &format!(
        "## Total time logged for all projects: {}\n",
        format_clock(report.total.num_seconds())
    );
    out
}

/// Writes the markdown report for the store's current entries into `out_dir`. Returns the path of
/// the written file, or None (and writes nothing) when the log is empty.
pub async fn export_to_dir(store: &LogStore, out_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(report) = aggregate(store.lines())? else {
        return Ok(None);
    };

    let path = out_dir.join(report.file_name());
    tokio::fs::write(&path, render_markdown(&report))
        .await
        .with_context(|| format!("Failed to write report {path:?}"))?;
    info!("Exported {} project(s) to {:?}", report.projects.len(), path);
    Ok(Some(path))
}
