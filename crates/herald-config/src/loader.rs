use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{parse_changed_files, HeraldConfig};
use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the working directory when no config path is given
pub const LOCAL_CONFIG_FILE: &str = "herald.toml";

/// Command-line values that take precedence over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file path; must exist when set
    pub config_file: Option<PathBuf>,
    /// Force dry run on
    pub dry_run: bool,
    /// Changed files as a JSON array
    pub files_json: Option<String>,
    /// Directory to scan
    pub root: Option<PathBuf>,
    /// Repository checkout root
    pub workspace: Option<PathBuf>,
    /// GitHub API base URL
    pub api_url: Option<String>,
}

impl HeraldConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(overrides: &ConfigOverrides) -> ConfigResult<Self> {
        Self::load_with_env(overrides, std::env::vars())
    }

    /// Same as [`HeraldConfig::load`] with an explicit environment
    pub fn load_with_env<I>(overrides: &ConfigOverrides, env: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Self::from_file_or_default(overrides.config_file.as_deref())?;

        config.apply_env(env)?;
        config.apply_overrides(overrides)?;

        Ok(config)
    }

    /// Apply command-line overrides (highest priority)
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> ConfigResult<()> {
        if overrides.dry_run {
            self.run.dry_run = true;
        }
        if let Some(json) = &overrides.files_json {
            let files = parse_changed_files(json)?;
            if !files.is_empty() {
                self.run.files = files;
            }
        }
        if let Some(root) = &overrides.root {
            self.run.root = root.clone();
        }
        if let Some(workspace) = &overrides.workspace {
            self.run.workspace = workspace.clone();
        }
        if let Some(url) = &overrides.api_url {
            self.github.api_url = url.clone();
        }
        Ok(())
    }

    /// Read the config file at `path`
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load config from file or return default
    ///
    /// An explicit path must exist. Without one, `./herald.toml` and then
    /// the user config directory are tried.
    fn from_file_or_default(config_file: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE))
            .chain(Self::default_config_path());

        for candidate in candidates {
            if candidate.is_file() {
                debug!("Loading config from {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Default config file path: `$XDG_CONFIG_HOME/herald/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("herald").join("config.toml"))
    }
}
