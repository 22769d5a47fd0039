//! Configuration Loader
//!
//! Loads settings from every source and merges them with proper precedence.

use crate::settings::{ColorSetting, Settings, SettingsFile};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Project settings file name, searched for from the working directory up.
pub const PROJECT_CONFIG_FILE: &str = ".stackscope.toml";

/// Configuration loader
///
/// Sources, lowest priority first:
/// 1. Global config (~/.stackscope/config.toml)
/// 2. Project config (.stackscope.toml) - overrides global
/// 3. Environment variables (STACKSCOPE_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective settings after every source was applied
    pub settings: Settings,

    /// Global and project files merged, before environment overrides
    pub file: SettingsFile,

    /// Directory holding the project settings file, if one was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use `path` instead of ~/.stackscope/config.toml as the global file.
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find .stackscope.toml, layers it over
    /// the global file, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let mut file = self.load_global_config()?;

        let (project_root, project_file) = self.find_project_config(start_dir)?;
        file.merge(&project_file);

        let mut settings = Settings::default();
        settings.apply(&file);
        apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            file,
            project_root,
        })
    }

    /// Find the project settings by walking up the directory tree
    fn find_project_config(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, SettingsFile)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.is_file() {
                let file = SettingsFile::load_from_file(&config_path)?;
                return Ok((Some(current), file));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, SettingsFile::default())),
            }
        }
    }

    /// Load the global settings; a missing file or home directory is empty
    fn load_global_config(&mut self) -> ConfigResult<SettingsFile> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match SettingsFile::global_config_path() {
                Ok(path) => path,
                Err(ConfigError::HomeNotFound) => return Ok(SettingsFile::default()),
                Err(e) => return Err(e),
            },
        };
        self.global_config_path = Some(path.clone());

        if !path.exists() {
            return Ok(SettingsFile::default());
        }

        SettingsFile::load_from_file(&path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Check if a project settings file was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}

/// Apply STACKSCOPE_WIDTH, STACKSCOPE_FRAME_LIMIT and STACKSCOPE_COLOR.
/// Empty variables are ignored.
fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    if let Some(width) = env_var("STACKSCOPE_WIDTH") {
        settings.set_width(parse_count("STACKSCOPE_WIDTH", &width)?)?;
    }

    if let Some(limit) = env_var("STACKSCOPE_FRAME_LIMIT") {
        settings.frame_limit = parse_count("STACKSCOPE_FRAME_LIMIT", &limit)?;
    }

    if let Some(color) = env_var("STACKSCOPE_COLOR") {
        settings.color = color.parse::<ColorSetting>()?;
    }

    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_count(field: &str, value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a non-negative integer, got '{}'", value),
        })
}
