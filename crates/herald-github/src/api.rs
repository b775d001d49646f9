//! Request executor seam
//!
//! Everything Herald asks of GitHub goes through [`GitHubApi`]. The HTTP
//! implementation lives in [`crate::client`]; tests can substitute their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GitHubResult;

/// Object identified by its GraphQL node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// Global node id
    pub node_id: String,
}

/// Current blob of a file in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Git blob SHA, required to delete the file
    pub sha: String,
}

/// Body of a delete-file call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    /// Commit message
    pub message: String,
    /// Blob SHA the deletion applies to
    pub sha: String,
}

/// A discussion that exists on GitHub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Discussion node id
    pub id: String,
    /// Web URL; search hits may lack one
    #[serde(default)]
    pub url: Option<String>,
}

impl Publication {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
        }
    }

    /// URL for log and commit messages
    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or("<unknown url>")
    }
}

/// Calls Herald makes against GitHub
///
/// One implementation per credential; the identity performing a call is
/// whichever token the implementation was built with.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Execute a GraphQL document and return its `data` object
    async fn graphql(&self, document: &str, variables: Value) -> GitHubResult<Value>;

    /// `GET /repos/{owner}/{repo}/labels/{name}`
    async fn get_label(&self, owner: &str, repo: &str, name: &str) -> GitHubResult<NodeRef>;

    /// `GET /repos/{owner}/{repo}`
    async fn get_repository(&self, owner: &str, repo: &str) -> GitHubResult<NodeRef>;

    /// `GET /repos/{owner}/{repo}/contents/{path}`
    async fn get_content(&self, owner: &str, repo: &str, path: &str) -> GitHubResult<ContentRef>;

    /// `DELETE /repos/{owner}/{repo}/contents/{path}`
    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &DeleteFileRequest,
    ) -> GitHubResult<()>;
}
