//! Herald front matter parser
//!
//! Splits a draft into its `---`-fenced YAML header and the Markdown body
//! that follows it. The split is lossless: [`ParsedDocument::reassemble`]
//! returns the exact input text.

pub mod error;
pub mod frontmatter;

pub use error::{ParserError, ParserResult};
pub use frontmatter::{FrontMatter, FrontMatterParser, ParsedDocument};
