use crate::domain::{config::TermLinkConfig, error::{TermLinkError, TermLinkResult}};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = ".termlink";
const CONFIG_FILE: &str = "config.toml";

/// Locates and loads the TermLink defaults file
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager from the user's home and working directory
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
            project_config_path: Self::find_project_config_path(),
        }
    }

    /// Create a manager with fixed lookup locations
    pub fn with_paths(global: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            global_config_path: global,
            project_config_path: project,
        }
    }

    /// File that `load` would read. An explicit path always wins, even when it
    /// does not exist.
    pub fn source(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        [&self.project_config_path, &self.global_config_path]
            .into_iter()
            .flatten()
            .find(|path| path.is_file())
            .cloned()
    }

    /// Load the first defaults file found, or built-in defaults when there is none
    pub fn load(&self, explicit: Option<&Path>) -> TermLinkResult<TermLinkConfig> {
        match self.source(explicit) {
            Some(path) => {
                debug!("Loading defaults from {}", path.display());
                Self::load_config_from_path(&path)
            }
            None => Ok(TermLinkConfig::default()),
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(path: &Path) -> TermLinkResult<TermLinkConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            TermLinkError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            TermLinkError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".config").join("termlink").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_project_config_from(&current_dir)
    }

    fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
            .find(|path| path.is_file())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
