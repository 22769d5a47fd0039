//! Settings files (~/.stackscope/config.toml and .stackscope.toml)
//!
//! Both files share one schema. Every key is optional; missing keys fall
//! through to the next-lower source and finally to [`Settings::default`].

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Narrowest display width accepted.
pub const MIN_WIDTH: usize = 20;

/// When to emit colored output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorSetting::Auto),
            "always" => Ok(ColorSetting::Always),
            "never" => Ok(ColorSetting::Never),
            other => Err(ConfigError::InvalidValue {
                field: "display.color".to_string(),
                reason: format!("must be 'auto', 'always', or 'never', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ColorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorSetting::Auto => "auto",
            ColorSetting::Always => "always",
            ColorSetting::Never => "never",
        };
        f.write_str(name)
    }
}

/// Contents of one settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Output layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,

    /// Multi-frame `info locals`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk: Option<WalkConfig>,
}

/// `[display]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Columns available for values and name lists (default: 80)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSetting>,
}

/// `[walk]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Frames visited per walk; 0 walks the whole stack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_limit: Option<usize>,

    /// Use the framed multi-frame output in the interactive prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framed: Option<bool>,
}

impl SettingsFile {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse settings text; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let file: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        file.validate()?;
        Ok(file)
    }

    /// Validate the settings
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(width) = self.display.as_ref().and_then(|d| d.width) {
            validate_width("display.width", width)?;
        }
        Ok(())
    }

    /// Get the global settings path (~/.stackscope/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".stackscope").join("config.toml"))
    }

    /// Merge another file into this one, key by key.
    /// Keys set in `other` take precedence.
    pub fn merge(&mut self, other: &SettingsFile) {
        if let Some(theirs) = &other.display {
            let ours = self.display.get_or_insert_with(Default::default);
            if theirs.width.is_some() {
                ours.width = theirs.width;
            }
            if theirs.color.is_some() {
                ours.color = theirs.color;
            }
        }
        if let Some(theirs) = &other.walk {
            let ours = self.walk.get_or_insert_with(Default::default);
            if theirs.frame_limit.is_some() {
                ours.frame_limit = theirs.frame_limit;
            }
            if theirs.framed.is_some() {
                ours.framed = theirs.framed;
            }
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub width: usize,
    pub color: ColorSetting,
    /// 0 means unbounded
    pub frame_limit: usize,
    pub framed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 80,
            color: ColorSetting::Auto,
            frame_limit: 0,
            framed: false,
        }
    }
}

impl Settings {
    /// Overlay the keys present in `file`.
    pub fn apply(&mut self, file: &SettingsFile) {
        if let Some(display) = &file.display {
            self.width = display.width.unwrap_or(self.width);
            self.color = display.color.unwrap_or(self.color);
        }
        if let Some(walk) = &file.walk {
            self.frame_limit = walk.frame_limit.unwrap_or(self.frame_limit);
            self.framed = walk.framed.unwrap_or(self.framed);
        }
    }

    /// Set the display width, rejecting widths below [`MIN_WIDTH`].
    pub fn set_width(&mut self, width: usize) -> ConfigResult<()> {
        validate_width("display.width", width)?;
        self.width = width;
        Ok(())
    }
}

fn validate_width(field: &str, width: usize) -> ConfigResult<()> {
    if width < MIN_WIDTH {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be at least {}, got {}", MIN_WIDTH, width),
        });
    }
    Ok(())
}
