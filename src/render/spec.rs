use geo::Point;

use crate::{
    config::RenderConfig,
    error::{Error, Result},
    join::JoinedLayer,
    render::{bins::Bins, color::{ramp, Rgb}},
    types::Category,
};

/// A region centroid, split into separate coordinate fields for label placement.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPoint {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// Basemap tiles for the interactive map; the URL template is passed through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileProvider {
    pub url: String,
    pub attribution: String,
}

/// Everything a backend needs to draw one choropleth. Coordinates are in the layer's CRS.
#[derive(Clone, Debug)]
pub struct RenderSpec {
    /// Score attribute the fill is driven by, e.g. `gap_C1`.
    pub fill: String,
    pub category: Category,
    pub title: String,
    pub legend_title: String,
    pub bins: Bins,
    /// One colour per bin.
    pub colors: Vec<Rgb>,
    pub missing_color: Rgb,
    pub center: Point<f64>,
    pub zoom: u8,
    pub labels: Option<Vec<LabelPoint>>,
    pub tiles: TileProvider,
    pub scale_bar: bool,
    pub popups: bool,
    pub epsg: u32,
}

fn parse_color(hex: &str) -> Result<Rgb> {
    Rgb::parse(hex).ok_or_else(|| Error::InvalidRenderSpec(format!("not a #rrggbb colour: {hex:?}")))
}

impl RenderSpec {
    /// Build the spec for `category` over the joined regions.
    pub fn build(joined: &JoinedLayer, category: Category, config: &RenderConfig) -> Result<Self> {
        let center = joined.layer().center()
            .ok_or_else(|| Error::InvalidRenderSpec("no regions to render".into()))?;

        let bins = Bins::from_style(config.style, &config.breaks, config.classes, &joined.values(category))?;
        let stops = config.palette.iter()
            .map(|hex| parse_color(hex))
            .collect::<Result<Vec<_>>>()?;
        let colors = ramp(&stops, bins.len());

        let labels = config.labels.then(|| {
            joined.layer().regions().iter()
                .zip(joined.layer().centroids())
                .filter_map(|(region, centroid)| centroid.map(|c| LabelPoint {
                    name: region.name.clone(),
                    lon: c.x(),
                    lat: c.y(),
                }))
                .collect()
        });

        Ok(Self {
            fill: category.score_field(),
            category,
            title: config.title.clone()
                .unwrap_or_else(|| format!("Equality score, {}: {}", category, category.description())),
            legend_title: config.legend_title.clone()
                .unwrap_or_else(|| "Women per 100 men".into()),
            bins,
            colors,
            missing_color: parse_color(&config.missing_color)?,
            center,
            zoom: config.zoom,
            labels,
            tiles: TileProvider { url: config.tile_url.clone(), attribution: config.tile_attribution.clone() },
            scale_bar: config.scale_bar,
            popups: config.popups,
            epsg: joined.epsg(),
        })
    }

    /// Colour for one value; undefined and out-of-range values get the missing colour.
    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        self.bins.classify(value)
            .and_then(|bin| self.colors.get(bin).copied())
            .unwrap_or(self.missing_color)
    }

    /// Fill colour of every joined region, in layer order.
    pub fn fill_colors(&self, joined: &JoinedLayer) -> Vec<Rgb> {
        joined.values(self.category).into_iter()
            .map(|value| self.color_for(value))
            .collect()
    }

    /// Legend rows, one per bin followed by the missing swatch.
    pub fn legend(&self) -> Vec<(String, Rgb)> {
        self.bins.labels().into_iter()
            .zip(self.colors.iter().copied())
            .chain(std::iter::once(("Missing".to_string(), self.missing_color)))
            .collect()
    }
}
