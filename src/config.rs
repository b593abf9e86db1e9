use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

use crate::symbols::SCALE_FACTOR;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub symbols: SymbolConfig,
    #[serde(default)]
    pub legend: LegendConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// Every year key seen on any feature, in chronological order
    #[default]
    Union,
    /// Year keys of a single reference feature, in property order
    Reference,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub geojson: PathBuf,
    #[serde(default = "default_name_property")]
    pub name_property: String,
    #[serde(default = "default_year_marker")]
    pub year_marker: String,
    #[serde(default)]
    pub discovery: Discovery,
    #[serde(default = "default_reference_feature")]
    pub reference_feature: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SymbolConfig {
    pub scale_factor: f64,
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            scale_factor: SCALE_FACTOR,
            fill_color: "#ff7800".to_string(),
            stroke_color: "#000".to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LegendConfig {
    pub caption_prefix: String,
    pub width: u32,
    pub height: u32,
    pub circle_x: f64,
    pub baseline: f64,
    pub text_x: f64,
    // label rows for max, mean, min
    pub text_rows: [f64; 3],
    pub fill_color: String,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            caption_prefix: "Percent homeless in".to_string(),
            width: 160,
            height: 90,
            circle_x: 30.0,
            baseline: 59.0,
            text_x: 65.0,
            text_rows: [20.0, 40.0, 60.0],
            fill_color: "#F47821".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("output") }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: PathBuf::from("."),
        }
    }
}

fn default_name_property() -> String {
    "name".to_string()
}

fn default_year_marker() -> String {
    "20".to_string()
}

fn default_reference_feature() -> usize {
    1
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Config pointing at `geojson` with every other setting at its default.
    pub fn for_dataset(geojson: impl Into<PathBuf>) -> Self {
        Self {
            input: InputConfig {
                geojson: geojson.into(),
                name_property: default_name_property(),
                year_marker: default_year_marker(),
                discovery: Discovery::default(),
                reference_feature: default_reference_feature(),
            },
            symbols: SymbolConfig::default(),
            legend: LegendConfig::default(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml("[input]\ngeojson = \"data/citypoints.geojson\"\n").unwrap();
        assert_eq!(config.input.geojson, PathBuf::from("data/citypoints.geojson"));
        assert_eq!(config.input.year_marker, "20");
        assert_eq!(config.input.discovery, Discovery::Union);
        assert_eq!(config.input.reference_feature, 1);
        assert_eq!(config.symbols.scale_factor, 1050.0);
        assert_eq!(config.legend.text_rows, [20.0, 40.0, 60.0]);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_reference_discovery_and_overrides() {
        let toml = r#"
            [input]
            geojson = "cities.geojson"
            discovery = "reference"
            reference_feature = 0

            [symbols]
            scale_factor = 500.0

            [server]
            port = 3000
        "#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.input.discovery, Discovery::Reference);
        assert_eq!(config.input.reference_feature, 0);
        assert_eq!(config.symbols.scale_factor, 500.0);
        assert_eq!(config.symbols.fill_color, "#ff7800");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_missing_input_section_fails() {
        assert!(AppConfig::from_toml("[server]\nport = 1\n").is_err());
    }
}
