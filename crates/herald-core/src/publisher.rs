//! The publish transaction for one draft
//!
//! Order: resolve category and repository ids, create the discussion, attach
//! labels, delete the source file. A failed create stops the transaction and
//! keeps the source. Label and delete failures after a successful create are
//! logged and recorded in the outcome; the next run's idempotency check
//! picks up from there.

use futures::future::try_join_all;
use herald_github::{GitHubContext, GitHubError, Publication, Repository};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::draft::Draft;

/// Errors from remote steps of the transaction
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to check whether {path} is published: {source}")]
    Search {
        path: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to resolve target for {path}: {source}")]
    Resolution {
        path: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to create discussion for {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to set labels for {path}: {source}")]
    Labels {
        path: String,
        #[source]
        source: GitHubError,
    },

    #[error("discussion id for {path} is unknown")]
    MissingDiscussion { path: String },

    #[error("failed to get SHA for draft {path}: {source}")]
    ContentHash {
        path: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to delete draft {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: GitHubError,
    },
}

/// Result of the idempotency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Unpublished,
    Published(Publication),
}

/// What happened to one follow-up step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    DryRun,
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Record of a publish transaction that got past the create step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Created discussion; `None` in dry run
    pub publication: Option<Publication>,
    pub labels: StepOutcome,
    pub deletion: StepOutcome,
}

impl PublishOutcome {
    /// No follow-up step failed
    pub fn is_clean(&self) -> bool {
        !self.labels.is_failed() && !self.deletion.is_failed()
    }
}

/// Result of [`Publisher::publish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishReport {
    /// A discussion already existed; nothing was called
    AlreadyPublished(Publication),
    /// The transaction ran, or was rehearsed in dry run
    Attempted(PublishOutcome),
}

/// Runs publish transactions against GitHub
#[derive(Clone)]
pub struct Publisher {
    context: GitHubContext,
    dry_run: bool,
}

impl Publisher {
    pub fn new(context: GitHubContext, dry_run: bool) -> Self {
        Self { context, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Repository handle acting as the draft's author
    fn repository(&self, draft: &Draft) -> Repository {
        let target = draft.repository();
        self.context
            .repository(&target.owner, &target.name, target.author.as_deref())
    }

    /// Look for a discussion already published from `draft`
    pub async fn check(&self, draft: &Draft) -> Result<PublishStatus, PublishError> {
        let found = self
            .repository(draft)
            .find_discussion(draft.title(), draft.date())
            .await
            .map_err(|source| PublishError::Search {
                path: draft.content_path(),
                source,
            })?;

        Ok(match found {
            Some(publication) => PublishStatus::Published(publication),
            None => PublishStatus::Unpublished,
        })
    }

    /// Publish `draft` unless `status` says it already is
    pub async fn publish(
        &self,
        draft: &Draft,
        status: PublishStatus,
    ) -> Result<PublishReport, PublishError> {
        if let PublishStatus::Published(publication) = status {
            info!(
                "Draft {} is already published at {}",
                draft.title(),
                publication.display_url()
            );
            return Ok(PublishReport::AlreadyPublished(publication));
        }

        let path = draft.content_path();
        let repository = self.repository(draft);
        let resolution = |source| PublishError::Resolution {
            path: path.clone(),
            source,
        };

        let category_id = repository
            .category_id(draft.category())
            .await
            .map_err(resolution)?;
        debug!("Category ID: {}", category_id);

        let repository_id = repository.id().await.map_err(resolution)?;
        debug!("Repository ID: {}", repository_id);

        let publication = if self.dry_run {
            info!("Dry run enabled. Skipping publishing post: {}", draft.title());
            None
        } else {
            info!("Publishing post: {}", draft.title());
            let publication = repository
                .create_discussion(&repository_id, draft.title(), draft.body(), &category_id)
                .await
                .map_err(|source| PublishError::Create {
                    path: path.clone(),
                    source,
                })?;
            info!(
                "Published post: {} at {}",
                draft.title(),
                publication.display_url()
            );
            Some(publication)
        };

        let labels = match self.add_labels(draft, publication.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                StepOutcome::Failed(e.to_string())
            }
        };

        let deletion = match self.delete(draft, publication.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                StepOutcome::Failed(e.to_string())
            }
        };

        Ok(PublishReport::Attempted(PublishOutcome {
            publication,
            labels,
            deletion,
        }))
    }

    /// Attach the draft's labels to the published discussion
    ///
    /// Every label must already exist in the repository.
    pub async fn add_labels(
        &self,
        draft: &Draft,
        publication: Option<&Publication>,
    ) -> Result<StepOutcome, PublishError> {
        if draft.labels().is_empty() {
            info!("No labels to set");
            return Ok(StepOutcome::Skipped("no labels".to_string()));
        }

        let repository = self.repository(draft);
        let label_ids = try_join_all(draft.labels().iter().map(|label| repository.label_id(label)))
            .await
            .map_err(|source| {
                if let GitHubError::LabelNotFound { label, .. } = &source {
                    warn!("Label '{}' does not exist in {}", label, repository.full_name());
                }
                PublishError::Labels {
                    path: draft.content_path(),
                    source,
                }
            })?;

        if self.dry_run {
            info!(
                "Dry run enabled. Skipping setting labels. Would have set: {}",
                draft.labels().join(", ")
            );
            return Ok(StepOutcome::DryRun);
        }

        let publication = publication.ok_or_else(|| PublishError::MissingDiscussion {
            path: draft.content_path(),
        })?;

        info!(
            "Setting labels for post {} as {}",
            draft.title(),
            draft.labels().join(", ")
        );
        repository
            .add_labels(&publication.id, &label_ids)
            .await
            .map_err(|source| PublishError::Labels {
                path: draft.content_path(),
                source,
            })?;

        Ok(StepOutcome::Done)
    }

    /// Remove the draft's source file from the repository
    pub async fn delete(
        &self,
        draft: &Draft,
        publication: Option<&Publication>,
    ) -> Result<StepOutcome, PublishError> {
        let path = draft.content_path();

        if self.dry_run {
            info!("Dry run enabled. Skipping deleting draft: {}", path);
            return Ok(StepOutcome::DryRun);
        }

        let publication = publication.ok_or_else(|| PublishError::MissingDiscussion {
            path: path.clone(),
        })?;

        debug!("Deleting draft: {}", path);
        let target = draft.repository();
        let repository = self.context.contents_repository(&target.owner, &target.name);

        let sha = repository
            .content_sha(&path)
            .await
            .map_err(|source| PublishError::ContentHash {
                path: path.clone(),
                source,
            })?;

        repository
            .delete_file(&path, &delete_message(&path, publication), &sha)
            .await
            .map_err(|source| PublishError::Delete {
                path: path.clone(),
                source,
            })?;

        info!("Deleted draft: {}", path);
        Ok(StepOutcome::Done)
    }
}

/// Commit message for removing a published draft
pub fn delete_message(path: &str, publication: &Publication) -> String {
    format!(
        "Delete {}\n\nThe post has been published as {}",
        path,
        publication.display_url()
    )
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}
