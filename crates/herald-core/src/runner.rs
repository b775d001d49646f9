//! Batch processing of drafts
//!
//! Drafts are handled one at a time; a failure on one file is logged and
//! recorded, then the run moves on to the next.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use herald_config::RunConfig;
use herald_github::Publication;
use tracing::{error, info, warn};

use crate::date::DateParser;
use crate::draft::Draft;
use crate::publisher::{PublishOutcome, PublishReport, Publisher};

/// File name never treated as a draft
pub const README: &str = "README.md";

/// Which files to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Explicit changed files; empty means scan `root`
    pub files: Vec<PathBuf>,
    pub root: PathBuf,
    /// Extension recognized by the directory scan
    pub extension: String,
    /// Repository checkout that draft keys are relative to
    pub workspace: PathBuf,
}

impl From<&RunConfig> for RunOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            files: config.files.clone(),
            root: config.root.clone(),
            extension: config.extension.clone(),
            workspace: config.workspace.clone(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&RunConfig::default())
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    /// The file did not load as a draft
    Invalid(String),
    /// Dated in the future
    SkippedFuture(DateTime<Utc>),
    AlreadyPublished(Publication),
    /// The publish transaction ran; check the step outcomes
    Published(PublishOutcome),
    /// A remote step failed before anything was created
    Failed(String),
}

impl DraftOutcome {
    /// Whether this file should fail the run
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Invalid(_) | Self::Failed(_) => true,
            Self::Published(outcome) => !outcome.is_clean(),
            Self::SkippedFuture(_) | Self::AlreadyPublished(_) => false,
        }
    }
}

/// Per-file results of a run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub entries: Vec<(PathBuf, DraftOutcome)>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|(_, outcome)| outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &(PathBuf, DraftOutcome)> {
        self.entries.iter().filter(|(_, outcome)| outcome.is_failure())
    }

    fn count(&self, predicate: impl Fn(&DraftOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| predicate(o)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} drafts: {} published, {} already published, {} scheduled, {} failed",
            self.entries.len(),
            self.count(|o| matches!(o, DraftOutcome::Published(_)) && !o.is_failure()),
            self.count(|o| matches!(o, DraftOutcome::AlreadyPublished(_))),
            self.count(|o| matches!(o, DraftOutcome::SkippedFuture(_))),
            self.count(DraftOutcome::is_failure),
        )
    }
}

/// Collect the drafts to process
///
/// Uses the explicit file list when it is non-empty, otherwise the files in
/// `root` (not recursive) with the configured extension, sorted. Files named
/// `README.md` in any case are dropped either way.
pub fn select_paths(options: &RunOptions) -> std::io::Result<Vec<PathBuf>> {
    let paths = if options.files.is_empty() {
        let mut found = Vec::new();
        for entry in std::fs::read_dir(&options.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&options.extension));
            if matches {
                found.push(path);
            }
        }
        found.sort();
        info!("Found {} drafts", found.len());
        found
    } else {
        options.files.clone()
    };

    Ok(paths.into_iter().filter(|path| !is_readme(path)).collect())
}

fn is_readme(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(README))
}

/// Drives the publisher over a set of files
pub struct PublishRunner {
    publisher: Publisher,
    dates: Arc<dyn DateParser>,
    options: RunOptions,
}

impl PublishRunner {
    pub fn new(publisher: Publisher, dates: Arc<dyn DateParser>, options: RunOptions) -> Self {
        Self {
            publisher,
            dates,
            options,
        }
    }

    /// Process every selected draft
    pub async fn run(&self) -> std::io::Result<RunReport> {
        self.run_at(Utc::now()).await
    }

    /// Process every selected draft, treating `now` as the current time
    pub async fn run_at(&self, now: DateTime<Utc>) -> std::io::Result<RunReport> {
        if self.publisher.is_dry_run() {
            info!("Dry run enabled. Skipping publishing drafts");
        }

        let paths = select_paths(&self.options)?;
        info!(
            "Processing drafts: {}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut report = RunReport::default();
        for path in paths {
            let outcome = self.process(&path, now).await;
            report.entries.push((path, outcome));
        }

        info!("{}", report);
        Ok(report)
    }

    /// Run one file through load, schedule check, idempotency check, publish
    pub async fn process(&self, path: &Path, now: DateTime<Utc>) -> DraftOutcome {
        let draft = match Draft::load(path, self.dates.as_ref()) {
            Ok(draft) => draft,
            Err(e) => return DraftOutcome::Invalid(e.to_string()),
        };
        let draft = match draft.relative_to(&self.options.workspace) {
            Ok(draft) => draft,
            Err(e) => {
                error!("{}", e);
                return DraftOutcome::Invalid(e.to_string());
            }
        };

        if !draft.is_past_at(now) && !self.publisher.is_dry_run() {
            info!(
                "Skipping draft {} with date {} as it is in the future",
                path.display(),
                draft.date()
            );
            return DraftOutcome::SkippedFuture(draft.date());
        }

        let status = match self.publisher.check(&draft).await {
            Ok(status) => status,
            Err(e) => {
                error!("{}", e);
                return DraftOutcome::Failed(e.to_string());
            }
        };

        match self.publisher.publish(&draft, status).await {
            Ok(PublishReport::AlreadyPublished(publication)) => {
                DraftOutcome::AlreadyPublished(publication)
            }
            Ok(PublishReport::Attempted(outcome)) => {
                if !outcome.is_clean() {
                    warn!("Draft {} was published with errors", path.display());
                }
                DraftOutcome::Published(outcome)
            }
            Err(e) => {
                error!("{}", e);
                DraftOutcome::Failed(e.to_string())
            }
        }
    }
}

impl fmt::Debug for PublishRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRunner")
            .field("publisher", &self.publisher)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
