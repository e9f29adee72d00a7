use std::{fs, path::Path};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{self as shp, dbase::{FieldValue, Record}, Reader, Shape};
use tracing::warn;

use crate::{
    config::InputConfig,
    error::{Error, Result},
    io::RawBoundaries,
    map::Region,
};

/// Convert a shapefile polygon to a geo MultiPolygon.
/// Shapefiles store each outer ring followed by its holes; a hole with no outer ring before it is promoted.
pub(crate) fn shp_to_geo(polygon: &shp::Polygon) -> MultiPolygon<f64> {
    fn ring(points: &[shp::Point]) -> LineString<f64> {
        let mut coords = points.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        LineString(coords)
    }

    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for part in polygon.rings() {
        match (part, exterior.is_some()) {
            (shp::PolygonRing::Inner(points), true) => holes.push(ring(points)),
            (shp::PolygonRing::Outer(points) | shp::PolygonRing::Inner(points), _) => {
                if let Some(previous) = exterior.replace(ring(points)) {
                    polygons.push(Polygon::new(previous, std::mem::take(&mut holes)));
                }
            }
        }
    }
    if let Some(previous) = exterior {
        polygons.push(Polygon::new(previous, holes));
    }

    MultiPolygon(polygons)
}

/// A dBase attribute rendered as a string.
fn field_string(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        FieldValue::Character(Some(s)) | FieldValue::Memo(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(n.to_string()),
        FieldValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

/// EPSG code implied by the WKT in a `.prj` sidecar.
pub(crate) fn epsg_from_prj(wkt: &str) -> Option<u32> {
    if let Some(epsg) = wkt.rfind("AUTHORITY[\"EPSG\",\"")
        .map(|start| &wkt[start + 18..])
        .and_then(|rest| rest.split('"').next())
        .and_then(|code| code.parse().ok())
    {
        return Some(epsg);
    }

    let wkt = wkt.to_ascii_lowercase();
    if wkt.contains("british_national_grid") || wkt.contains("osgb_1936_british") || wkt.contains("osgb36") {
        Some(27700)
    } else if wkt.starts_with("projcs") && wkt.contains("mercator_auxiliary_sphere") {
        Some(3857)
    } else if wkt.starts_with("geogcs") && wkt.contains("wgs_1984") {
        Some(4326)
    } else if wkt.starts_with("geogcs") && wkt.contains("etrs_1989") {
        Some(4258)
    } else {
        None
    }
}

/// Reads all polygon shapes and their name/council attributes from a `.shp` file.
pub(crate) fn read_boundaries(path: &Path, input: &InputConfig) -> Result<RawBoundaries> {
    let mut reader = Reader::from_path(path)
        .map_err(|e| Error::unavailable(path, format!("failed to open shapefile: {e}")))?;

    let mut features = Vec::new();
    for (idx, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result
            .map_err(|e| Error::unavailable(path, format!("error reading shape {idx}: {e}")))?;

        let Some(name) = field_string(&record, &input.name_key) else {
            warn!(shape = idx, key = %input.name_key, "shape has no name; skipping");
            continue;
        };
        let council = field_string(&record, &input.council_key);

        let shape = match shape {
            Shape::Polygon(polygon) => shp_to_geo(&polygon),
            other => {
                warn!(region = %name, shape_type = ?other.shapetype(), "shape is not a 2D polygon; skipping");
                continue;
            }
        };
        features.push((Region { name, council }, shape));
    }

    let epsg = fs::read_to_string(path.with_extension("prj")).ok()
        .and_then(|wkt| epsg_from_prj(&wkt));

    Ok(RawBoundaries { features, epsg })
}
