//! # Herald GitHub
//!
//! GitHub access for the publish pipeline:
//!
//! - [`GitHubApi`]: the request executor seam, implemented over HTTP by
//!   [`RestClient`]
//! - [`GitHubContext`]: the credential set, one client per identity
//! - [`Repository`]: resolves labels, categories and the repository itself to
//!   node ids, searches for already-published discussions and issues the
//!   discussion mutations
//! - [`SearchQuery`]: typed builder for GitHub search expressions

pub mod api;
pub mod client;
pub mod context;
pub mod error;
pub mod queries;
pub mod repository;
pub mod search;

pub use api::{ContentRef, DeleteFileRequest, GitHubApi, NodeRef, Publication};
pub use client::RestClient;
pub use context::GitHubContext;
pub use error::{GitHubError, GitHubResult};
pub use repository::Repository;
pub use search::SearchQuery;
