//! Drafts: Markdown files waiting to become discussions
//!
//! A [`Draft`] only exists once its front matter has passed validation. A
//! file that fails to load yields a [`DraftError`] instead, so there is
//! nothing to publish or delete for it.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use herald_parser::{FrontMatter, FrontMatterParser, ParserError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::date::DateParser;

/// Front matter keys every draft must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "repository", "date", "category", "body"];

/// Why a file could not become a [`Draft`]
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("failed to read draft {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse front matter in draft {path}: {source}")]
    FrontMatter {
        path: String,
        #[source]
        source: ParserError,
    },

    #[error("draft {path} is missing required fields: {}", .fields.join(", "))]
    MissingFields {
        path: String,
        fields: Vec<&'static str>,
    },

    #[error("draft {path} has invalid repository '{value}', expected owner/name")]
    InvalidRepository { path: String, value: String },

    #[error("failed to parse date '{value}' in draft {path}")]
    UnparsableDate { path: String, value: String },

    #[error("failed to resolve {path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("draft {path} is outside the repository checkout {workspace}")]
    OutsideRepository { path: String, workspace: String },
}

/// Target repository of a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    /// Identity to publish as, when not the default
    pub author: Option<String>,
}

impl RepositoryRef {
    /// Parse `owner/name`; both halves must be non-empty
    pub fn parse(value: &str) -> Option<Self> {
        let (owner, name) = value.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            author: None,
        })
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A validated draft
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    path: PathBuf,
    content_path: String,
    contents: String,
    title: String,
    body: String,
    repository: RepositoryRef,
    date: DateTime<Utc>,
    category: String,
    labels: Vec<String>,
}

impl Draft {
    /// Read and validate the draft at `path`
    ///
    /// Failures are logged at error level before being returned.
    pub fn load(path: impl AsRef<Path>, dates: &dyn DateParser) -> Result<Self, DraftError> {
        let path = path.as_ref();
        info!("Reading draft: {}", path.display());

        let result = std::fs::read_to_string(path)
            .map_err(|source| DraftError::Read {
                path: path.display().to_string(),
                source,
            })
            .and_then(|contents| Self::parse(path, contents, dates));

        if let Err(e) = &result {
            error!("{}", e);
        }
        result
    }

    /// Validate already-read `contents` as the draft at `path`
    pub fn parse(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
        dates: &dyn DateParser,
    ) -> Result<Self, DraftError> {
        let path = path.into();
        let contents = contents.into();
        let path_display = path.display().to_string();

        let document = FrontMatterParser::new()
            .parse(&contents)
            .map_err(|source| DraftError::FrontMatter {
                path: path_display.clone(),
                source,
            })?;
        let front_matter = &document.front_matter;
        let body = document.body.trim().to_string();

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| match *field {
                "body" => body.is_empty(),
                key => scalar(front_matter, key).is_none(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(DraftError::MissingFields {
                path: path_display,
                fields: missing,
            });
        }

        // Presence checked above
        let title = scalar(front_matter, "title").unwrap_or_default();
        let category = scalar(front_matter, "category").unwrap_or_default();
        let repository_value = scalar(front_matter, "repository").unwrap_or_default();
        let date_value = scalar(front_matter, "date").unwrap_or_default();

        let repository = RepositoryRef::parse(&repository_value)
            .ok_or_else(|| DraftError::InvalidRepository {
                path: path_display.clone(),
                value: repository_value.clone(),
            })?
            .with_author(scalar(front_matter, "author"));

        let date = dates
            .parse(&date_value)
            .ok_or_else(|| DraftError::UnparsableDate {
                path: path_display.clone(),
                value: date_value.clone(),
            })?;
        info!("{} has date: {}", path_display, date);

        let labels = parse_labels(front_matter);

        if let Ok(yaml) = serde_yaml::to_string(front_matter.properties()) {
            debug!("Front matter for draft {}:\n{}", path_display, yaml);
        }

        Ok(Self {
            content_path: repository_key(&path),
            path,
            contents,
            title,
            body,
            repository,
            date,
            category,
            labels,
        })
    }

    /// Path the draft was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the repository root, as used by the contents API
    ///
    /// Taken from the path as given until [`Draft::relative_to`] rebases it
    /// on the checkout.
    pub fn content_path(&self) -> String {
        self.content_path.clone()
    }

    /// Key the draft by its location inside the checkout at `workspace`
    ///
    /// Both paths are resolved on disk, so absolute and relative spellings
    /// of the same file give the same key.
    pub fn relative_to(mut self, workspace: &Path) -> Result<Self, DraftError> {
        let resolve = |path: &Path| {
            path.canonicalize().map_err(|source| DraftError::Resolve {
                path: path.display().to_string(),
                source,
            })
        };
        let file = resolve(self.path.as_path())?;
        let root = resolve(workspace)?;

        let relative = file
            .strip_prefix(&root)
            .map_err(|_| DraftError::OutsideRepository {
                path: self.path.display().to_string(),
                workspace: workspace.display().to_string(),
            })?;
        self.content_path = repository_key(relative);
        Ok(self)
    }

    /// Full file text, front matter included
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Text after the front matter, trimmed
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Label names in front matter order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Whether the publication date is strictly before `now`
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

}

/// `/`-joined normal components of `path`
fn repository_key(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Non-blank scalar value for `key`
fn scalar(front_matter: &FrontMatter, key: &str) -> Option<String> {
    front_matter
        .get_string(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Labels from `labels` or `label`, either a comma list or a sequence
fn parse_labels(front_matter: &FrontMatter) -> Vec<String> {
    let value = ["labels", "label"]
        .into_iter()
        .find_map(|key| front_matter.get(key).filter(|v| !v.is_null()));

    let raw: Vec<String> = match value {
        Some(Value::Array(_)) => ["labels", "label"]
            .into_iter()
            .find_map(|key| front_matter.get_array(key))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Bool(b)) => vec![b.to_string()],
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}
