use std::{fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Run configuration, read from TOML. Every section and field has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub statistics: StatisticsConfig,
    pub processing: ProcessingConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub boundaries: Option<PathBuf>,
    pub statistics: Option<PathBuf>,
    /// Feature attribute holding the region name.
    pub name_key: String,
    /// Feature attribute holding the containing council area.
    pub council_key: String,
    /// EPSG code of the boundary file, overriding whatever the file declares.
    pub epsg: Option<u32>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            boundaries: None,
            statistics: None,
            name_key: "Name".into(),
            council_key: "Council".into(),
            epsg: None,
        }
    }
}

/// Layout of the delimited statistics file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub name_column: String,
    pub gender_column: String,
    /// Headers of the eight category columns, C1 first.
    pub category_columns: Vec<String>,
    /// Region name of the national aggregate row.
    pub sentinel: String,
    pub delimiter: char,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            name_column: "ward".into(),
            gender_column: "sex".into(),
            category_columns: (1..=8).map(|n| format!("C{n}")).collect(),
            sentinel: "Scotland".into(),
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// CRS the joined layer is reprojected to before rendering.
    pub target_epsg: u32,
    /// Repair invalid geometries before any spatial predicate.
    pub make_valid: bool,
    /// Restrict the rendered map to one council area.
    pub council: Option<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { target_epsg: 4326, make_valid: true, council: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinStyle {
    /// Use `breaks` as given.
    Fixed,
    /// `classes` equal-width bins over the data range.
    Equal,
    /// `classes` bins holding roughly equal numbers of regions.
    Quantile,
}

/// Styling handed to the renderers; nothing here is read from ambient state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: Option<String>,
    pub legend_title: Option<String>,
    pub style: BinStyle,
    pub breaks: Vec<f64>,
    pub classes: usize,
    /// Colour stops (hex), interpolated to one colour per bin.
    pub palette: Vec<String>,
    pub missing_color: String,
    pub zoom: u8,
    pub labels: bool,
    pub popups: bool,
    pub scale_bar: bool,
    /// Tile URL template for the interactive map, passed through as-is.
    pub tile_url: String,
    pub tile_attribution: String,
    pub width: f64,
    pub margin: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: None,
            legend_title: None,
            style: BinStyle::Fixed,
            breaks: vec![0.0, 50.0, 75.0, 90.0, 110.0, 150.0, 200.0, f64::INFINITY],
            classes: 5,
            palette: vec!["#ca0020".into(), "#f7f7f7".into(), "#0571b0".into()],
            missing_color: "#969696".into(),
            zoom: 10,
            labels: false,
            popups: true,
            scale_bar: true,
            tile_url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".into(),
            tile_attribution: "&copy; OpenStreetMap contributors &copy; CARTO".into(),
            width: 1200.0,
            margin: 20.0,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::unavailable(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.statistics.category_columns.len() != 8 {
            return Err(Error::Config(format!(
                "statistics.category_columns needs 8 headers, got {}", self.statistics.category_columns.len()
            )));
        }
        if !self.statistics.delimiter.is_ascii() {
            return Err(Error::Config("statistics.delimiter must be a single ASCII character".into()));
        }
        if self.render.palette.is_empty() {
            return Err(Error::Config("render.palette needs at least one colour".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BinStyle, Config};
    use crate::error::Error;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.input.name_key, "Name");
        assert_eq!(config.statistics.sentinel, "Scotland");
        assert_eq!(config.statistics.category_columns[7], "C8");
        assert_eq!(config.processing.target_epsg, 4326);
        assert_eq!(config.render.style, BinStyle::Fixed);
        assert!(config.render.breaks.last().unwrap().is_infinite());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(r#"
            [input]
            boundaries = "wards.shp"
            epsg = 27700

            [statistics]
            name_column = "Electoral Ward 2022"
            delimiter = ";"

            [processing]
            council = "City of Edinburgh"

            [render]
            style = "quantile"
            classes = 4
            breaks = [0.0, 100.0, inf]
        "#).unwrap();

        assert_eq!(config.input.epsg, Some(27700));
        assert_eq!(config.statistics.name_column, "Electoral Ward 2022");
        assert_eq!(config.statistics.delimiter, ';');
        assert_eq!(config.processing.council.as_deref(), Some("City of Edinburgh"));
        assert_eq!(config.render.style, BinStyle::Quantile);
        assert_eq!(config.render.breaks.len(), 3);
    }

    #[test]
    fn wrong_number_of_category_columns_is_rejected() {
        let result = Config::from_toml(r#"
            [statistics]
            category_columns = ["C1", "C2"]
        "#);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
