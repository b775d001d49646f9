//! Error types for front matter parsing.

use thiserror::Error;

/// Errors that can occur while splitting or parsing front matter.
#[derive(Error, Debug)]
pub enum ParserError {
    /// The text does not start with a `---` fenced header.
    #[error("no front matter block found at the start of the text")]
    MissingFrontMatter,

    /// The header span is not valid YAML.
    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The header parsed, but into something other than a key/value mapping.
    #[error("front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
