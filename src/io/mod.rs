//! Reading and writing, organized by format.
//!
//! - `csv` - statistics input, score and point tables output
//! - `geojson` - boundary input, joined layer export
//! - `shp` - ESRI Shapefile boundary input (with `.prj` sidecar)

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod shp;

use std::path::Path;

use geo::MultiPolygon;

use crate::{config::InputConfig, error::{Error, Result}, map::Region};

/// Boundary features as read from disk, before they become a layer.
pub(crate) struct RawBoundaries {
    pub(crate) features: Vec<(Region, MultiPolygon<f64>)>,
    /// EPSG code declared by the file, if any.
    pub(crate) epsg: Option<u32>,
}

/// Read a boundary file, choosing the reader by extension.
pub(crate) fn read_boundaries(path: &Path, input: &InputConfig) -> Result<RawBoundaries> {
    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::unavailable(path, "boundary file has no extension"))?;

    match extension.as_str() {
        "geojson" | "json" => geojson::read_boundaries(path, input),
        "shp" => shp::read_boundaries(path, input),
        other => Err(Error::unavailable(path, format!("unsupported boundary format .{other}"))),
    }
}

/// EPSG code named in a CRS identifier such as `EPSG:27700` or `urn:ogc:def:crs:EPSG::27700`.
pub(crate) fn epsg_from_identifier(identifier: &str) -> Option<u32> {
    if identifier.ends_with("CRS84") { return Some(4326) }
    let (_, code) = identifier.rsplit_once("EPSG")?;
    code.trim_start_matches(':').parse().ok()
}
