use crate::domain::{
    config::BoardComConfig,
    error::{BoardComError, BoardComResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> BoardComResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Load configuration from files. A project-local config, when present,
    /// takes precedence over the global one; defaults fill the rest.
    pub fn load_config(&self) -> BoardComResult<BoardComConfig> {
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                return self.load_config_from_path(project_path);
            }
        }

        if self.global_config_path.exists() {
            return self.load_config_from_path(&self.global_config_path);
        }

        Ok(BoardComConfig::default())
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> BoardComResult<BoardComConfig> {
        let content = fs::read_to_string(path).map_err(|e| BoardComError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| BoardComError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to the global config file
    pub fn save_config(&self, config: &BoardComConfig) -> BoardComResult<()> {
        if let Some(parent) = self.global_config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BoardComError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }
        self.save_config_to_path(&self.global_config_path, config)
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(
        &self,
        path: &Path,
        config: &BoardComConfig,
    ) -> BoardComResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| BoardComError::Config {
            message: format!("Failed to serialize configuration: {}", e),
        })?;

        fs::write(path, content).map_err(|e| BoardComError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> BoardComResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| BoardComError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("boardcom").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".boardcom").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }
}
