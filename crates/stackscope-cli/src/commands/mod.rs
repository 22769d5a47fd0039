pub mod debug;
pub mod locals;

use anyhow::{Context, Result};
use stackscope_config::ColorSetting;
use stackscope_runtime::{ColorMode, StackSnapshot};
use std::path::Path;

/// Load a recorded stack from a JSON snapshot file.
pub fn load_snapshot(path: &Path) -> Result<StackSnapshot> {
    StackSnapshot::load(path)
        .with_context(|| format!("Failed to read snapshot '{}'", path.display()))
}

/// Terminal color mode for a configured color setting.
pub fn color_mode(setting: ColorSetting) -> ColorMode {
    match setting {
        ColorSetting::Auto => ColorMode::Auto,
        ColorSetting::Always => ColorMode::Always,
        ColorSetting::Never => ColorMode::Never,
    }
}
