//! The analysis as a sequence of named stages.
//!
//! Each stage takes the previous stage's output by reference and returns a new value, so a
//! caller can stop anywhere (the `scores` command never touches geometry) or inspect any
//! intermediate result.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    config::{Config, InputConfig, ProcessingConfig, RenderConfig, StatisticsConfig},
    error::{Error, Result},
    geom,
    io,
    join::{join_scores, JoinReport, JoinedLayer, PointMatch},
    map::RegionLayer,
    render::RenderSpec,
    score::ScoreTable,
    types::{Category, ClassificationCount},
};

/// EPSG code assumed when neither the file nor the configuration names one (RFC 7946).
pub const DEFAULT_EPSG: u32 = 4326;

/// Read the boundary file into a layer. The configured EPSG code wins over the file's own.
/// A layer labelled geographic must have lon/lat coordinates.
pub fn load_boundaries(path: &Path, input: &InputConfig) -> Result<RegionLayer> {
    let raw = io::read_boundaries(path, input)?;
    if raw.features.is_empty() {
        return Err(Error::unavailable(path, "no named polygon features"));
    }

    let epsg = input.epsg.or(raw.epsg).unwrap_or(DEFAULT_EPSG);
    geom::proj4_for_epsg(epsg)?;
    if let (Some(configured), Some(declared)) = (input.epsg, raw.epsg) {
        if configured != declared {
            warn!(configured, declared, "configured EPSG overrides the one declared by the boundary file");
        }
    }

    let layer = RegionLayer::from_features(raw.features, epsg);
    if geom::is_geographic(epsg) {
        if let Some(bounds) = layer.bounds() {
            let (min, max) = (bounds.min(), bounds.max());
            if min.x < -180.0 || max.x > 180.0 || min.y < -90.0 || max.y > 90.0 {
                warn!(epsg, ?bounds, "boundary coordinates fall outside lon/lat range");
                return Err(Error::unavailable(path, "coordinates are not lon/lat; set input.epsg"));
            }
        }
    }
    info!(path = %path.display(), regions = layer.len(), epsg, "loaded boundaries");
    Ok(layer)
}

/// Read the statistics file into long-form counts.
pub fn load_counts(path: &Path, layout: &StatisticsConfig) -> Result<Vec<ClassificationCount>> {
    let counts = io::csv::read_counts(path, layout)?;
    info!(path = %path.display(), rows = counts.len(), "loaded classification counts");
    Ok(counts)
}

/// Score every region except the national aggregate.
pub fn compute_scores(counts: &[ClassificationCount], sentinel: &str) -> ScoreTable {
    let table = ScoreTable::from_rows(counts, sentinel);
    info!(regions = table.len(), undefined = table.undefined_count(), "computed equality scores");
    for category in Category::ALL {
        let summary = table.summary(category);
        debug!(%category, defined = summary.defined, undefined = summary.undefined,
            min = ?summary.min, max = ?summary.max, mean = ?summary.mean, "score summary");
    }
    table
}

/// Repair geometries when configured to.
pub fn prepare_layer(layer: RegionLayer, processing: &ProcessingConfig) -> Result<RegionLayer> {
    if processing.make_valid { layer.make_valid() } else { Ok(layer) }
}

/// Reproject to the configured target CRS and apply the optional council filter.
pub fn finish_layer(joined: JoinedLayer, processing: &ProcessingConfig) -> Result<JoinedLayer> {
    let joined = joined.reproject(processing.target_epsg)?;
    let Some(council) = processing.council.as_deref() else { return Ok(joined) };

    let filtered = joined.filter_by_council(council);
    if filtered.is_empty() {
        return Err(Error::Config(format!("no joined regions in council {council:?}")));
    }
    info!(council, regions = filtered.len(), "filtered to council");
    Ok(filtered)
}

/// Every intermediate of one run.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Boundaries as loaded and repaired, in their source CRS.
    pub layer: RegionLayer,
    pub scores: ScoreTable,
    /// Joined regions in the target CRS, council filter applied.
    pub joined: JoinedLayer,
    pub report: JoinReport,
}

impl Analysis {
    /// Run load, score, prepare, join and finish in order.
    pub fn run(boundaries: &Path, statistics: &Path, config: &Config) -> Result<Self> {
        let layer = load_boundaries(boundaries, &config.input)?;
        let counts = load_counts(statistics, &config.statistics)?;
        let scores = compute_scores(&counts, &config.statistics.sentinel);
        let layer = prepare_layer(layer, &config.processing)?;
        let (joined, report) = join_scores(&layer, &scores);
        let joined = finish_layer(joined, &config.processing)?;
        Ok(Self { layer, scores, joined, report })
    }

    /// Render spec for one category over the joined regions.
    pub fn render_spec(&self, category: Category, render: &RenderConfig) -> Result<RenderSpec> {
        RenderSpec::build(&self.joined, category, render)
    }
}

/// Write the score table as CSV (`name`, `gap_C1` .. `gap_C8`).
pub fn export_scores(table: &ScoreTable, path: &Path) -> Result<()> {
    io::csv::write_scores(table, path)?;
    info!(path = %path.display(), rows = table.len(), "wrote scores");
    Ok(())
}

/// Write the joined regions as a GeoJSON FeatureCollection carrying one category's scores.
pub fn export_geojson(joined: &JoinedLayer, category: Category, path: &Path) -> Result<()> {
    io::geojson::write_geojson(&joined.to_geojson(category, None), path)?;
    info!(path = %path.display(), regions = joined.len(), "wrote GeoJSON");
    Ok(())
}

/// Write point-in-polygon results as CSV (`x`, `y`, `name`, `council`).
pub fn export_point_matches(matches: &[PointMatch], path: &Path) -> Result<()> {
    io::csv::write_point_matches(matches, path)?;
    info!(path = %path.display(), points = matches.len(), "wrote point matches");
    Ok(())
}
