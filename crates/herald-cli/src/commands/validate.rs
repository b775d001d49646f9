//! `herald validate`

use std::path::PathBuf;

use anyhow::{Context, Result};
use herald_config::HeraldConfig;
use herald_core::{select_paths, Draft, NaturalDateParser, RunOptions};

/// Validate drafts locally, printing one line per file
///
/// Returns whether every draft is valid.
pub fn execute(config: &HeraldConfig, paths: Vec<PathBuf>) -> Result<bool> {
    let mut options = RunOptions::from(&config.run);
    if !paths.is_empty() {
        options.files = paths;
    }

    let paths = select_paths(&options)
        .with_context(|| format!("Failed to scan {}", options.root.display()))?;
    if paths.is_empty() {
        println!("No drafts found.");
        return Ok(true);
    }

    let dates = NaturalDateParser::new();
    let mut valid = true;
    for path in paths {
        match Draft::load(&path, &dates).and_then(|draft| draft.relative_to(&options.workspace)) {
            Ok(draft) => println!("✓ {}", describe(&draft)),
            Err(e) => {
                valid = false;
                println!("✗ {}", e);
            }
        }
    }

    Ok(valid)
}

/// One-line summary of a valid draft
pub fn describe(draft: &Draft) -> String {
    let mut line = format!(
        "{}: \"{}\" → {} [{}] on {}",
        draft.path().display(),
        draft.title(),
        draft.repository().full_name(),
        draft.category(),
        draft.date().format("%Y-%m-%d %H:%M UTC"),
    );
    if !draft.labels().is_empty() {
        line.push_str(&format!(" labels: {}", draft.labels().join(", ")));
    }
    if let Some(author) = &draft.repository().author {
        line.push_str(&format!(" as {author}"));
    }
    line
}
