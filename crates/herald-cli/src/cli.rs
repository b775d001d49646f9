use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use herald_config::ConfigOverrides;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "herald")]
#[command(about = "herald - publish dated Markdown drafts as GitHub Discussions")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute (defaults to publish if not provided)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (off, error, warn, info, debug, trace)
    /// RUST_LOG takes precedence when set
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ./herald.toml, then ~/.config/herald/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish every draft whose date has passed
    Publish(PublishArgs),

    /// Parse and validate drafts without contacting GitHub
    Validate {
        /// Draft files to check (defaults to scanning the root directory)
        paths: Vec<PathBuf>,

        /// Directory to scan when no paths are given
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Resolve everything but create, label and delete nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Changed files as a JSON array (replaces the directory scan)
    #[arg(long, value_name = "JSON")]
    pub files: Option<String>,

    /// Directory to scan for drafts
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Repository checkout that draft paths are relative to
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long)]
    pub api_url: Option<String>,
}

impl Cli {
    /// Level used when RUST_LOG is unset
    pub fn log_filter(&self) -> LevelFilter {
        if self.verbose {
            return LevelFilter::DEBUG;
        }
        self.log_level.map(Into::into).unwrap_or(LevelFilter::INFO)
    }

    /// Config overrides carried by the command line
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            config_file: self.config.clone(),
            ..ConfigOverrides::default()
        };

        match &self.command {
            Some(Commands::Publish(args)) => {
                overrides.dry_run = args.dry_run;
                overrides.files_json = args.files.clone();
                overrides.root = args.root.clone();
                overrides.workspace = args.workspace.clone();
                overrides.api_url = args.api_url.clone();
            }
            Some(Commands::Validate { root, .. }) => {
                overrides.root = root.clone();
            }
            None => {}
        }

        overrides
    }
}
