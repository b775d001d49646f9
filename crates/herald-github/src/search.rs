//! GitHub search expression builder
//!
//! Clause values are quoted whenever they could be read as more than a single
//! search term, so a title such as `Release notes: "beta" -draft` stays one
//! phrase instead of turning into qualifiers and exclusions.

use std::fmt;

use chrono::NaiveDate;

/// Search expression built clause by clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one repository: `repo:owner/name`
    pub fn repo(mut self, owner: &str, name: &str) -> Self {
        self.clauses
            .push(format!("repo:{}", quote(&format!("{owner}/{name}"))));
        self
    }

    /// Restrict to a kind of object: `is:discussion`
    pub fn is(mut self, kind: &str) -> Self {
        self.clauses.push(format!("is:{}", quote(kind)));
        self
    }

    /// Match `text` in titles: `in:title "text"`
    pub fn in_title(mut self, text: &str) -> Self {
        self.clauses.push("in:title".to_string());
        self.clauses.push(quote(text));
        self
    }

    /// Lower bound on the creation date: `created:>=YYYY-MM-DD`
    pub fn created_on_or_after(mut self, date: NaiveDate) -> Self {
        self.clauses
            .push(format!("created:>={}", date.format("%Y-%m-%d")));
        self
    }

    /// Render the expression
    pub fn build(&self) -> String {
        self.clauses.join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.starts_with('-')
        || matches!(value, "AND" | "OR" | "NOT")
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | ':' | '(' | ')'))
}

/// Quote and escape a clause value when needed
fn quote(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            // Newlines would end the phrase
            '\n' | '\r' | '\t' => quoted.push(' '),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
