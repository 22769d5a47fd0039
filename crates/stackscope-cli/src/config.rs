//! CLI configuration via environment variables
//!
//! Display and walk settings come from `stackscope-config`; this module only
//! covers what the line editor needs.

use std::env;
use std::path::PathBuf;

/// Line-editor configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Custom history file path (STACKSCOPE_HISTORY_FILE=/path/to/file)
    pub history_file: Option<PathBuf>,
    /// Disable history persistence (STACKSCOPE_NO_HISTORY=1)
    pub no_history: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            history_file: env::var("STACKSCOPE_HISTORY_FILE").ok().map(PathBuf::from),
            no_history: env::var("STACKSCOPE_NO_HISTORY").is_ok(),
        }
    }

    /// Get the history file path
    ///
    /// Returns:
    /// 1. None if history is disabled
    /// 2. STACKSCOPE_HISTORY_FILE if set
    /// 3. ~/.stackscope/history if home directory exists
    pub fn history_path(&self) -> Option<PathBuf> {
        if self.no_history {
            return None;
        }
        if let Some(ref path) = self.history_file {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(".stackscope").join("history"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
