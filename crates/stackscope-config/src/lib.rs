//! Stackscope Configuration
//!
//! Display and stack-walk settings for the `stackscope` debugger, read from:
//! - Global user configuration (~/.stackscope/config.toml)
//! - Project configuration (.stackscope.toml, searched upward from the
//!   working directory)
//! - Environment variables (STACKSCOPE_*)
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Built-in defaults
//! 2. Global config (~/.stackscope/config.toml)
//! 3. Project config (.stackscope.toml)
//! 4. Environment variables (STACKSCOPE_WIDTH, STACKSCOPE_FRAME_LIMIT,
//!    STACKSCOPE_COLOR)
//! 5. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use stackscope_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("width = {}", config.settings.width);
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::{Config, ConfigLoader, PROJECT_CONFIG_FILE};
pub use settings::{ColorSetting, Settings, SettingsFile, MIN_WIDTH};
