//! Shell configuration.
//!
//! Configuration can be loaded from:
//! - An explicit `--config` path
//! - `parlor.toml` in one of the default locations
//! - Built-in defaults

use anyhow::{Context, Result};
use parlor_core::palette::{DEFAULT_COLORS, DEFAULT_FALLBACK};
use parlor_core::{Palette, RoomConfig, RoomPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Transition policy.
    #[serde(default)]
    pub room: RoomPolicy,

    /// Participant colours.
    #[serde(default)]
    pub palette: PaletteConfig,

    /// Output configuration.
    #[serde(default)]
    pub render: RenderConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Palette configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Colours assigned by roster position.
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,

    /// Colour for authors who are not present.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Show message timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,

    /// Print snapshots as JSON instead of text.
    #[serde(default)]
    pub json: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect()
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            fallback: default_fallback(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timestamps: true,
            json: false,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let config_paths = [
            "parlor.toml",
            "/etc/parlor/parlor.toml",
            "~/.config/parlor/parlor.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Build the room configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette has no colours.
    pub fn room_config(&self) -> Result<RoomConfig> {
        let palette = Palette::new(
            self.palette.colors.iter().cloned(),
            self.palette.fallback.clone(),
        )
        .context("Invalid [palette] section")?;

        Ok(RoomConfig {
            policy: self.room,
            palette,
            ..RoomConfig::default()
        })
    }
}
