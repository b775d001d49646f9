//! # Herald Core
//!
//! Turns dated Markdown drafts into GitHub Discussions, exactly once.
//!
//! - [`Draft`]: a validated draft loaded from disk
//! - [`Publisher`]: the per-draft publish transaction (create, label, delete)
//! - [`PublishRunner`]: selects files and drives the publisher over them
//! - [`DateParser`]: seam for reading the free-form `date` field

pub mod date;
pub mod draft;
pub mod publisher;
pub mod runner;

pub use date::{DateParser, NaturalDateParser};
pub use draft::{Draft, DraftError, RepositoryRef, REQUIRED_FIELDS};
pub use publisher::{
    delete_message, PublishError, PublishOutcome, PublishReport, PublishStatus, Publisher,
    StepOutcome,
};
pub use runner::{select_paths, DraftOutcome, PublishRunner, RunOptions, RunReport};
