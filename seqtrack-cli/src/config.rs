//! Configuration handling for the SeqTrack CLI
//!
//! Supports loading configuration from seqtrack.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use seqtrack_core::{StyleTable, TrackAttributes};
use seqtrack_render::ExportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Track attributes applied before command-line overrides
    #[serde(default)]
    pub track: TrackAttributes,

    #[serde(default)]
    pub render: RenderConfig,

    /// Per-type overrides layered over the built-in style table
    #[serde(default)]
    pub styles: StyleTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Default canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Draw the residue ruler under the track
    #[serde(default = "default_true")]
    pub show_ruler: bool,

    /// Add a footer with layout details and a timestamp
    #[serde(default = "default_true")]
    pub show_footer: bool,

    /// Attach hover titles to every fragment
    #[serde(default = "default_true")]
    pub fragment_titles: bool,

    #[serde(default = "default_background")]
    pub background_color: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

// Default value functions
fn default_width() -> u32 { 800 }
fn default_true() -> bool { true }
fn default_background() -> String { "#ffffff".to_string() }
fn default_font_family() -> String { "Arial, sans-serif".to_string() }
fn default_font_size() -> u32 { 12 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            show_ruler: true,
            show_footer: true,
            fragment_titles: true,
            background_color: default_background(),
            font_family: default_font_family(),
            font_size: default_font_size(),
        }
    }
}

impl RenderConfig {
    /// Export settings for the SVG presenter
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            width: self.width,
            show_ruler: self.show_ruler,
            show_footer: self.show_footer,
            fragment_titles: self.fragment_titles,
            background_color: self.background_color.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            ..ExportConfig::default()
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find seqtrack.toml in current directory
                let default_path = PathBuf::from("seqtrack.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seqtrack.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }

    /// Built-in type styles with this configuration's overrides on top
    pub fn style_table(&self) -> StyleTable {
        let mut table = StyleTable::builtin();
        table.merge(&self.styles);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrack_core::LayoutStrategy;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.track.track_height, 44.0);
        assert_eq!(config.track.layout, LayoutStrategy::Stacked);
        assert_eq!(config.render.width, 800);
        assert!(config.styles.is_empty());
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.track.layout = LayoutStrategy::NonOverlapping;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.track, config.track);
        assert_eq!(loaded_config.render.width, config.render.width);

        Ok(())
    }

    #[test]
    fn test_example_toml_generation() -> Result<()> {
        let example = Config::example_toml()?;
        assert!(example.contains("[track]"));
        assert!(example.contains("[render]"));
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r##"
            [track]
            layout = "non-overlapping"
            track_height = 60.0

            [styles.domain]
            color = "#123456"
            "##,
        )
        .unwrap();
        assert_eq!(config.track.layout, LayoutStrategy::NonOverlapping);
        assert_eq!(config.track.track_height, 60.0);
        assert_eq!(config.track.default_color, "black");
        assert_eq!(config.render.font_size, 12);

        let table = config.style_table();
        assert_eq!(table.color_for("DOMAIN"), Some("#123456"));
        assert_eq!(table.shape_for("DOMAIN"), Some("rectangle"));
    }
}
