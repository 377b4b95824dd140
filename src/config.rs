//! Application configuration loaded from an optional `config.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// Spreadsheet of per-state crime counts plus a population column.
    pub crime_csv: PathBuf,
    /// State boundary polygons.
    pub shapefile: PathBuf,
    /// State-name column in the crime spreadsheet.
    pub state_column_csv: String,
    /// State-name field in the shapefile attribute table.
    pub name_field_shape: String,
    /// Population column in the crime spreadsheet.
    pub population_column: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            crime_csv: PathBuf::from("data/crime.csv"),
            shapefile: PathBuf::from("data/India_State_Boundary.shp"),
            state_column_csv: "State/UT".to_string(),
            name_field_shape: "Name".to_string(),
            population_column: "Population".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 1000,
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when the file is absent.
    /// A file that exists but fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_stock_files() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.input.state_column_csv, "State/UT");
        assert_eq!(cfg.input.name_field_shape, "Name");
        assert_eq!(cfg.input.population_column, "Population");
        assert!(cfg.map.width > 0 && cfg.map.height > 0);
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [map]
            width = 640
            height = 480
            "#,
        )
        .unwrap();
        assert_eq!(cfg.map.width, 640);
        assert_eq!(cfg.input.crime_csv, PathBuf::from("data/crime.csv"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(cfg.input.name_field_shape, "Name");
    }
}
