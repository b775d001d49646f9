//! Credential set for platform calls
//!
//! Built once at startup and passed down explicitly. Discussion creation and
//! lookups use the discussion client (or a per-author client); repository
//! content reads and deletes use the contents client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use herald_config::{Credentials, GitHubConfig};
use tracing::error;

use crate::api::GitHubApi;
use crate::client::RestClient;
use crate::error::GitHubResult;
use crate::repository::Repository;

/// One client per identity, read-only after construction
#[derive(Clone)]
pub struct GitHubContext {
    discussions: Arc<dyn GitHubApi>,
    contents: Arc<dyn GitHubApi>,
    authors: HashMap<String, Arc<dyn GitHubApi>>,
}

impl GitHubContext {
    pub fn new(discussions: Arc<dyn GitHubApi>, contents: Arc<dyn GitHubApi>) -> Self {
        Self {
            discussions,
            contents,
            authors: HashMap::new(),
        }
    }

    /// Register a client that acts as `author`
    pub fn with_author(mut self, author: &str, client: Arc<dyn GitHubApi>) -> Self {
        self.authors.insert(author.to_lowercase(), client);
        self
    }

    /// Build HTTP clients for every configured credential
    pub fn from_credentials(config: &GitHubConfig, credentials: &Credentials) -> GitHubResult<Self> {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        let client = |token: &str| -> GitHubResult<Arc<dyn GitHubApi>> {
            let client: Arc<dyn GitHubApi> =
                Arc::new(RestClient::new(&config.api_url, token, timeout)?);
            Ok(client)
        };

        let mut context = Self::new(
            client(credentials.discussion_token())?,
            client(credentials.repo_token())?,
        );
        for (author, token) in credentials.authors() {
            context = context.with_author(author, client(token)?);
        }
        Ok(context)
    }

    /// Client that creates and looks up discussions for `author`
    ///
    /// Falls back to the default discussion client when the author has no
    /// configured token.
    pub fn discussions_for(&self, author: Option<&str>) -> Arc<dyn GitHubApi> {
        match author.filter(|a| !a.is_empty()) {
            None => Arc::clone(&self.discussions),
            Some(author) => match self.authors.get(&author.to_lowercase()) {
                Some(client) => Arc::clone(client),
                None => {
                    error!(
                        "No discussion token configured for author '{}', using the default identity",
                        author
                    );
                    Arc::clone(&self.discussions)
                }
            },
        }
    }

    /// Client for repository content reads and deletes
    pub fn contents(&self) -> Arc<dyn GitHubApi> {
        Arc::clone(&self.contents)
    }

    /// Repository handle whose lookups and mutations run as `author`
    pub fn repository(&self, owner: &str, name: &str, author: Option<&str>) -> Repository {
        Repository::new(owner, name, self.discussions_for(author))
    }

    /// Repository handle for content operations
    pub fn contents_repository(&self, owner: &str, name: &str) -> Repository {
        Repository::new(owner, name, self.contents())
    }
}
