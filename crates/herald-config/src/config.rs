use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{ConfigError, ConfigResult};

/// Default GitHub REST/GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Prefix for per-author discussion tokens in the environment
pub const AUTHOR_TOKEN_PREFIX: &str = "INPUT_DISCUSSION_TOKEN_";

/// Top-level Herald configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeraldConfig {
    /// GitHub endpoint settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Tokens used for platform calls
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// What to process and how
    #[serde(default)]
    pub run: RunConfig,
}

/// GitHub endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubConfig {
    /// Base URL for REST calls; GraphQL is served at `{api_url}/graphql`
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds; unset keeps the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Raw credential settings as they appear in the config file
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CredentialsConfig {
    /// Token allowed to create discussions and attach labels
    #[serde(default)]
    pub discussion_token: Option<String>,

    /// Token allowed to read and delete repository contents
    #[serde(default)]
    pub repo_token: Option<String>,

    /// Per-author discussion tokens keyed by author name
    #[serde(default)]
    pub authors: HashMap<String, String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut authors: Vec<&String> = self.authors.keys().collect();
        authors.sort();
        f.debug_struct("CredentialsConfig")
            .field("discussion_token", &self.discussion_token.as_ref().map(|_| "<redacted>"))
            .field("repo_token", &self.repo_token.as_ref().map(|_| "<redacted>"))
            .field("authors", &authors)
            .finish()
    }
}

/// Run options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Perform reads only; suppress create, label and delete calls
    #[serde(default)]
    pub dry_run: bool,

    /// Explicit list of changed files; empty means scan `root`
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Directory scanned for drafts when no changed files are given
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extension recognized as a draft
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Repository checkout that contents API paths are relative to
    #[serde(default = "default_root")]
    pub workspace: PathBuf,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: None,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            files: Vec::new(),
            root: default_root(),
            extension: default_extension(),
            workspace: default_root(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "md".to_string()
}

impl HeraldConfig {
    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variables on top of the current values
    ///
    /// Takes the variables as pairs so callers can pass `std::env::vars()`
    /// or a fixed set in tests. Empty values are treated as unset, matching
    /// how GitHub Actions passes omitted inputs.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut github_token = None;

        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }

            match key {
                "INPUT_DISCUSSION_TOKEN" => self.credentials.discussion_token = Some(value),
                "INPUT_REPO_TOKEN" => self.credentials.repo_token = Some(value),
                "GITHUB_TOKEN" => github_token = Some(value),
                "INPUT_DRY_RUN" => self.run.dry_run = parse_bool(key, &value)?,
                "INPUT_FILES" => self.run.files = parse_changed_files(&value)?,
                "GITHUB_API_URL" => self.github.api_url = value,
                "GITHUB_WORKSPACE" => self.run.workspace = PathBuf::from(value),
                _ => {
                    if let Some(author) = key.strip_prefix(AUTHOR_TOKEN_PREFIX) {
                        if !author.is_empty() {
                            self.credentials
                                .authors
                                .insert(author.to_lowercase(), value);
                        }
                    }
                }
            }
        }

        if self.credentials.repo_token.is_none() {
            self.credentials.repo_token = github_token;
        }

        Ok(())
    }

    /// Resolve the credential set used for platform calls
    pub fn credentials(&self) -> ConfigResult<Credentials> {
        let discussion_token = self
            .credentials
            .discussion_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredential("discussion token"))?;

        let repo_token = self
            .credentials
            .repo_token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| discussion_token.clone());

        let authors = self
            .credentials
            .authors
            .iter()
            .filter(|(_, token)| !token.is_empty())
            .map(|(name, token)| (name.to_lowercase(), token.clone()))
            .collect();

        Ok(Credentials::new(discussion_token, repo_token, authors))
    }
}

/// Parse a `true`/`false` flag
pub fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}

/// Parse a JSON array of paths, as produced by changed-files CI actions
pub fn parse_changed_files(json: &str) -> ConfigResult<Vec<PathBuf>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let paths: Vec<PathBuf> = serde_json::from_str(json)?;
    Ok(paths)
}
