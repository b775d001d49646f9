//! Resolved credential set
//!
//! One token creates discussions and attaches labels, a second reads and
//! deletes repository contents. Optional per-author tokens let a draft be
//! published as a different identity than the default automation account.

use std::collections::HashMap;

/// Tokens used for platform calls, read-only after loading
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    discussion_token: String,
    repo_token: String,
    authors: HashMap<String, String>,
}

impl Credentials {
    /// Build a credential set; author names are matched case-insensitively
    pub fn new(
        discussion_token: impl Into<String>,
        repo_token: impl Into<String>,
        authors: HashMap<String, String>,
    ) -> Self {
        Self {
            discussion_token: discussion_token.into(),
            repo_token: repo_token.into(),
            authors: authors
                .into_iter()
                .map(|(name, token)| (name.to_lowercase(), token))
                .collect(),
        }
    }

    /// Token for discussion creation and labeling
    pub fn discussion_token(&self) -> &str {
        &self.discussion_token
    }

    /// Token for repository content reads and deletes
    pub fn repo_token(&self) -> &str {
        &self.repo_token
    }

    /// Token configured for `author`, if any
    pub fn author_token(&self, author: &str) -> Option<&str> {
        self.authors.get(&author.to_lowercase()).map(String::as_str)
    }

    /// Iterate over configured author names and tokens
    pub fn authors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.authors
            .iter()
            .map(|(name, token)| (name.as_str(), token.as_str()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut authors: Vec<&String> = self.authors.keys().collect();
        authors.sort();
        f.debug_struct("Credentials")
            .field("discussion_token", &"<redacted>")
            .field("repo_token", &"<redacted>")
            .field("authors", &authors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_lookup_is_case_insensitive() {
        let mut authors = HashMap::new();
        authors.insert("Alice".to_string(), "a-token".to_string());
        let credentials = Credentials::new("d", "r", authors);

        assert_eq!(credentials.author_token("alice"), Some("a-token"));
        assert_eq!(credentials.author_token("ALICE"), Some("a-token"));
        assert_eq!(credentials.author_token("bob"), None);
    }
}
