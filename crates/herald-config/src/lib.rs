//! # Herald Configuration
//!
//! Loads run options and GitHub credentials with the precedence
//! defaults < config file < environment < command line.
//!
//! Environment variables follow the GitHub Actions input convention
//! (`INPUT_DISCUSSION_TOKEN`, `INPUT_DRY_RUN`, `INPUT_FILES`, ...), so the
//! binary can run unchanged as an action step.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod credentials;
mod error;
mod loader;

pub use config::*;
pub use credentials::Credentials;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigOverrides;
