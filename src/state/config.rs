use crate::git::WalkScope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Commits read and laid out per page.
    pub page_size: usize,
    /// Upper bound on commits in one window.
    pub max_commits: usize,
    /// Walk every local branch instead of HEAD only.
    pub all_branches: bool,
    /// Warn once the graph grows wider than this many lanes.
    pub lane_warning_threshold: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_commits: 2000,
            all_branches: false,
            lane_warning_threshold: 32,
        }
    }
}

impl GraphConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("git-lanes").join("config.json"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Read a config file, falling back to defaults when it is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn scope(&self) -> WalkScope {
        if self.all_branches {
            WalkScope::AllBranches
        } else {
            WalkScope::Head
        }
    }
}
