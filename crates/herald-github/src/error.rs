//! Error types for GitHub operations.

use thiserror::Error;

/// Errors that can occur while talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API error ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The requested resource does not exist (HTTP 404)
    #[error("not found: {0}")]
    NotFound(String),

    /// The GraphQL response carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No discussion category with this exact name
    #[error("category '{category}' not found in {repository}")]
    CategoryNotFound {
        /// Requested category name
        category: String,
        /// `owner/name`
        repository: String,
    },

    /// No label with this name
    #[error("label '{label}' not found in {repository}")]
    LabelNotFound {
        /// Requested label name
        label: String,
        /// `owner/name`
        repository: String,
    },
}

/// Result type for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;
