//! Configuration management for worktui.
//!
//! Handles persistence and loading of user preferences: where projects live,
//! which assistant command to launch, and the initial sort order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app::SortKey;

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for repositories by the project picker
    /// (defaults to `~/code`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,

    /// Program launched for assistant sessions
    #[serde(default = "default_assistant_command")]
    pub assistant_command: String,

    /// Sort order the worktree list starts with
    #[serde(default)]
    pub default_sort: SortKey,

    /// Claude Code data directory (defaults to `~/.claude`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_dir: Option<PathBuf>,
}

fn default_assistant_command() -> String {
    "claude".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: None,
            assistant_command: default_assistant_command(),
            default_sort: SortKey::default(),
            claude_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;

        Ok(config_dir.join("worktui").join("config.json"))
    }

    pub fn projects_dir(&self) -> Result<PathBuf> {
        match &self.projects_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::home_dir()
                .context("Could not find home directory")?
                .join("code")),
        }
    }

    pub fn claude_dir(&self) -> Result<PathBuf> {
        match &self.claude_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::home_dir()
                .context("Could not find home directory")?
                .join(".claude")),
        }
    }
}
