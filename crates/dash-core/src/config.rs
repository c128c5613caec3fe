// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout and reflow settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Packing geometry shared by every placement check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum clearance between panels, in pixels
    pub gap: f32,

    /// Pixel width of a panel spanning one column
    pub span_base: f32,

    /// Extra pixel width for every additional column
    pub span_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 16.0,
            span_base: 128.0,
            span_step: 144.0,
        }
    }
}

impl LayoutConfig {
    /// Map a column span to a pixel width. Spans below 1 are treated as 1.
    pub fn pixel_width(&self, span: u32) -> f32 {
        let extra = span.max(1) - 1;
        self.span_base + self.span_step * extra as f32
    }
}

/// Event coalescing and drag behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflowSettings {
    /// Window in milliseconds during which repeated reflow requests collapse
    /// into one trailing pass (0 disables coalescing)
    pub coalesce_window_ms: u64,

    /// Re-run placement on every drag move instead of only on drag stop
    pub reflow_during_drag: bool,
}

impl Default for ReflowSettings {
    fn default() -> Self {
        Self {
            coalesce_window_ms: 150,
            reflow_during_drag: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Packing geometry
    pub layout: LayoutConfig,

    /// Reflow behavior
    pub reflow: ReflowSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid gap {0}: must be finite and non-negative")]
    InvalidGap(f32),
}

impl Config {
    /// Get the default config file path (~/.config/dashpack/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dashpack").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let gap = self.layout.gap;
        if !gap.is_finite() || gap < 0.0 {
            return Err(ConfigError::InvalidGap(gap));
        }
        Ok(())
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
