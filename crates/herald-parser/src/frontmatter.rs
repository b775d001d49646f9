//! Front matter extraction
//!
//! A draft starts with a YAML header fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Draft post
//! repository: owner/repo
//! ---
//! Body of draft post
//! ```
//!
//! The header must begin at offset 0, contain at least one character, and the
//! closing fence must be followed by a newline. Everything after the closing
//! fence is the body, kept verbatim.

use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::error::{ParserError, ParserResult};

fn header_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"^---\n([\s\S]+?)\n---\n").expect("front matter pattern is valid")
    })
}

/// Parsed front matter block
///
/// Keeps the raw header text next to the parsed properties so the original
/// document can be rebuilt without re-serializing YAML.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    /// Raw header content (without the `---` fences)
    pub raw: String,

    properties: Map<String, Value>,
}

impl FrontMatter {
    /// Parse a raw header span into a key/value mapping.
    pub fn from_raw(raw: impl Into<String>) -> ParserResult<Self> {
        let raw = raw.into();
        let value: Value = serde_yaml::from_str(&raw)?;

        let properties = match value {
            Value::Object(map) => map,
            Value::Null => return Err(ParserError::NotAMapping("an empty document")),
            Value::Array(_) => return Err(ParserError::NotAMapping("a sequence")),
            Value::String(_) => return Err(ParserError::NotAMapping("a string")),
            Value::Number(_) => return Err(ParserError::NotAMapping("a number")),
            Value::Bool(_) => return Err(ParserError::NotAMapping("a boolean")),
        };

        Ok(Self { raw, properties })
    }

    /// All parsed properties
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Get a raw property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Get a scalar property rendered as a string
    ///
    /// Strings are returned as-is; numbers and booleans are rendered with
    /// their display form. `null`, sequences and mappings yield `None`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Get a sequence property as strings, skipping non-scalar entries
    pub fn get_array(&self, key: &str) -> Option<Vec<String>> {
        self.properties
            .get(key)?
            .as_array()?
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .into()
    }
}

/// A document split into front matter and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// The parsed header
    pub front_matter: FrontMatter,

    /// Text after the closing fence, untrimmed
    pub body: String,
}

impl ParsedDocument {
    /// Rebuild the original text from header and body.
    pub fn reassemble(&self) -> String {
        format!("---\n{}\n---\n{}", self.front_matter.raw, self.body)
    }
}

/// Parser for `---`-fenced YAML front matter
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatterParser;

impl FrontMatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Split `content` into its front matter and body.
    pub fn parse(&self, content: &str) -> ParserResult<ParsedDocument> {
        let (raw, body) = Self::split(content).ok_or(ParserError::MissingFrontMatter)?;
        let front_matter = FrontMatter::from_raw(raw)?;

        Ok(ParsedDocument {
            front_matter,
            body: body.to_string(),
        })
    }

    /// Locate the header span and the body without parsing YAML.
    pub fn split(content: &str) -> Option<(&str, &str)> {
        let captures = header_pattern().captures(content)?;
        let whole = captures.get(0)?;
        let header = captures.get(1)?;

        Some((header.as_str(), &content[whole.end()..]))
    }
}
