//! HTTP implementation of [`GitHubApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::{ContentRef, DeleteFileRequest, GitHubApi, NodeRef};
use crate::error::{GitHubError, GitHubResult};

const USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// GitHub REST + GraphQL client authenticated with a single token
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Create a client for `base_url` (e.g. `https://api.github.com`)
    ///
    /// GraphQL requests go to `{base_url}/graphql`.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> GitHubResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::with_client(client, base_url, token))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Turn non-success statuses into errors, keeping 404s distinguishable
    async fn check(response: Response, resource: &str) -> GitHubResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(resource.to_string()));
        }

        Err(GitHubError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> GitHubResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::check(response, resource).await?;
        response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(format!("{resource}: {e}")))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Percent-encode each segment of a repository path, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[async_trait]
impl GitHubApi for RestClient {
    async fn graphql(&self, document: &str, variables: Value) -> GitHubResult<Value> {
        let response = self
            .request(Method::POST, "/graphql")
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await?;
        let response = Self::check(response, "graphql").await?;

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(format!("graphql: {e}")))?;

        if !body.errors.is_empty() {
            let messages = body
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GitHubError::GraphQl(messages));
        }

        body.data
            .ok_or_else(|| GitHubError::InvalidResponse("graphql response has no data".to_string()))
    }

    async fn get_label(&self, owner: &str, repo: &str, name: &str) -> GitHubResult<NodeRef> {
        let path = format!(
            "/repos/{}/{}/labels/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            urlencoding::encode(name)
        );
        self.get_json(&path, &format!("label {name}")).await
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> GitHubResult<NodeRef> {
        let path = format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        self.get_json(&path, &format!("repository {owner}/{repo}")).await
    }

    async fn get_content(&self, owner: &str, repo: &str, path: &str) -> GitHubResult<ContentRef> {
        let url = format!(
            "/repos/{}/{}/contents/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            encode_path(path)
        );
        let resource = format!("content {path}");
        let value: Value = self.get_json(&url, &resource).await?;

        // Directories come back as an array of entries
        let entry = match &value {
            Value::Array(entries) => entries.first().ok_or_else(|| {
                GitHubError::InvalidResponse(format!("{resource}: empty listing"))
            })?,
            other => other,
        };

        entry
            .get("sha")
            .and_then(Value::as_str)
            .map(|sha| ContentRef {
                sha: sha.to_string(),
            })
            .ok_or_else(|| GitHubError::InvalidResponse(format!("{resource}: missing sha")))
    }

    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &DeleteFileRequest,
    ) -> GitHubResult<()> {
        let url = format!(
            "/repos/{}/{}/contents/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            encode_path(path)
        );
        let response = self.request(Method::DELETE, &url).json(request).send().await?;
        Self::check(response, &format!("content {path}")).await?;
        Ok(())
    }
}
