//! Repository identity resolution
//!
//! Maps symbolic names (label, category, the repository itself) to GitHub
//! node ids and looks up discussions that were already published. Nothing is
//! cached: every call asks GitHub, so state is always re-derived from the
//! remote side.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::{DeleteFileRequest, GitHubApi, Publication};
use crate::error::{GitHubError, GitHubResult};
use crate::queries;
use crate::search::SearchQuery;

/// A repository bound to the client that performs calls on its behalf
#[derive(Clone)]
pub struct Repository {
    owner: String,
    name: String,
    client: Arc<dyn GitHubApi>,
}

#[derive(Deserialize)]
struct CategoriesData {
    repository: Option<CategoriesRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesRepository {
    discussion_categories: Nodes<Category>,
}

#[derive(Deserialize)]
struct Category {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct SearchData {
    search: Nodes<SearchNode>,
}

/// Non-discussion hits come back as empty objects
#[derive(Deserialize)]
struct SearchNode {
    id: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    create_discussion: CreatePayload,
}

#[derive(Deserialize)]
struct CreatePayload {
    discussion: CreatedDiscussion,
}

#[derive(Deserialize)]
struct CreatedDiscussion {
    id: String,
    url: String,
}

fn decode<T: for<'de> Deserialize<'de>>(data: Value, what: &str) -> GitHubResult<T> {
    serde_json::from_value(data).map_err(|e| GitHubError::InvalidResponse(format!("{what}: {e}")))
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, client: Arc<dyn GitHubApi>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            client,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Resolve a label name to its node id
    pub async fn label_id(&self, label: &str) -> GitHubResult<String> {
        debug!("Getting label: {}", label);
        match self.client.get_label(&self.owner, &self.name, label).await {
            Ok(node) => Ok(node.node_id),
            Err(GitHubError::NotFound(_)) => Err(GitHubError::LabelNotFound {
                label: label.to_string(),
                repository: self.full_name(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Resolve a discussion category by exact, case-sensitive name
    ///
    /// Only the first 100 categories are considered.
    pub async fn category_id(&self, category: &str) -> GitHubResult<String> {
        debug!("Getting category: {}", category);
        let data = self
            .client
            .graphql(
                queries::DISCUSSION_CATEGORIES,
                json!({ "owner": self.owner, "name": self.name }),
            )
            .await?;

        let data: CategoriesData = decode(data, "discussion categories")?;
        let repository = data
            .repository
            .ok_or_else(|| GitHubError::NotFound(format!("repository {}", self.full_name())))?;

        repository
            .discussion_categories
            .nodes
            .into_iter()
            .find(|c| c.name == category)
            .map(|c| c.id)
            .ok_or_else(|| GitHubError::CategoryNotFound {
                category: category.to_string(),
                repository: self.full_name(),
            })
    }

    /// Resolve the repository's own node id
    pub async fn id(&self) -> GitHubResult<String> {
        debug!("Getting repository: {}", self.full_name());
        let node = self.client.get_repository(&self.owner, &self.name).await?;
        Ok(node.node_id)
    }

    /// Look for a discussion published from this title on or after `date`
    ///
    /// Matches on a title phrase and a creation-date lower bound, so two
    /// drafts sharing a title can shadow each other when the older one's
    /// discussion was created after the newer one's date.
    pub async fn find_discussion(
        &self,
        title: &str,
        date: DateTime<Utc>,
    ) -> GitHubResult<Option<Publication>> {
        let query = SearchQuery::new()
            .repo(&self.owner, &self.name)
            .is("discussion")
            .in_title(title)
            .created_on_or_after(date.date_naive())
            .build();
        debug!("Searching for discussion: {}", query);

        let data = self
            .client
            .graphql(queries::SEARCH_DISCUSSIONS, json!({ "q": query }))
            .await?;
        let data: SearchData = decode(data, "discussion search")?;

        let found = data.search.nodes.into_iter().find_map(|node| {
            node.id.map(|id| Publication { id, url: node.url })
        });

        match &found {
            Some(publication) => info!(
                "Found existing discussion with title \"{}\" and date {}: {}",
                title,
                date,
                publication.display_url()
            ),
            None => info!(
                "No existing discussion found with title \"{}\" and date {}",
                title, date
            ),
        }

        Ok(found)
    }

    /// Create a discussion and return its id and URL
    pub async fn create_discussion(
        &self,
        repository_id: &str,
        title: &str,
        body: &str,
        category_id: &str,
    ) -> GitHubResult<Publication> {
        let variables = json!({
            "repositoryId": repository_id,
            "title": title,
            "body": body,
            "categoryId": category_id,
        });
        let data = self
            .client
            .graphql(queries::CREATE_DISCUSSION, variables)
            .await?;
        let data: CreateData = decode(data, "create discussion")?;
        let discussion = data.create_discussion.discussion;

        Ok(Publication::new(discussion.id, discussion.url))
    }

    /// Attach already-resolved labels to a discussion
    pub async fn add_labels(&self, discussion_id: &str, label_ids: &[String]) -> GitHubResult<()> {
        self.client
            .graphql(
                queries::ADD_LABELS,
                json!({ "discussionId": discussion_id, "labelIds": label_ids }),
            )
            .await?;
        Ok(())
    }

    /// Blob SHA of the file at `path` on the default branch
    pub async fn content_sha(&self, path: &str) -> GitHubResult<String> {
        let content = self.client.get_content(&self.owner, &self.name, path).await?;
        debug!("SHA for {} is {}", path, content.sha);
        Ok(content.sha)
    }

    /// Delete the file at `path`, which must currently have blob `sha`
    pub async fn delete_file(&self, path: &str, message: &str, sha: &str) -> GitHubResult<()> {
        let request = DeleteFileRequest {
            message: message.to_string(),
            sha: sha.to_string(),
        };
        self.client
            .delete_file(&self.owner, &self.name, path, &request)
            .await
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
