use std::{fs::File, io::{BufReader, BufWriter, Write}, path::Path};

use geo::{Geometry, MultiPolygon};
use geojson::{GeoJson, JsonObject};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::{
    config::InputConfig,
    error::{Error, Result},
    io::{epsg_from_identifier, RawBoundaries},
    join::JoinedLayer,
    map::Region,
    types::Category,
};

/// Read a GeoJSON FeatureCollection of (multi)polygons from `path`.
pub(crate) fn read_boundaries(path: &Path, input: &InputConfig) -> Result<RawBoundaries> {
    let file = File::open(path)
        .map_err(|e| Error::unavailable(path, e))?;
    let geojson = GeoJson::from_reader(BufReader::new(file))
        .map_err(|e| Error::unavailable(path, format!("failed to parse GeoJSON: {e}")))?;
    boundaries_from_geojson(geojson, input)
        .map_err(|reason| Error::unavailable(path, reason))
}

/// A property rendered as a string; numbers are accepted for numeric codes.
fn property_string(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn boundaries_from_geojson(geojson: GeoJson, input: &InputConfig) -> std::result::Result<RawBoundaries, String> {
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err("GeoJSON must be a FeatureCollection".into());
    };

    // Pre-RFC 7946 files (e.g. British National Grid exports) name their CRS in a `crs` member.
    let epsg = collection.foreign_members.as_ref()
        .and_then(|members| members.get("crs"))
        .and_then(|crs| crs["properties"]["name"].as_str())
        .and_then(epsg_from_identifier);

    let mut features = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.as_ref();
        let Some(name) = property_string(properties, &input.name_key) else {
            warn!(feature = idx, key = %input.name_key, "feature has no name; skipping");
            continue;
        };
        let council = property_string(properties, &input.council_key);

        let Some(geometry) = feature.geometry else {
            warn!(region = %name, "feature has no geometry; skipping");
            continue;
        };
        let shape = match Geometry::<f64>::try_from(geometry.value) {
            Ok(Geometry::MultiPolygon(shape)) => shape,
            Ok(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
            Ok(_) => {
                warn!(region = %name, "feature is not a polygon; skipping");
                continue;
            }
            Err(e) => return Err(format!("feature {name:?}: {e}")),
        };

        features.push((Region { name, council }, shape));
    }

    Ok(RawBoundaries { features, epsg })
}

/// Helper to convert a MultiPolygon to a serde_json::Value representing GeoJSON Geometry.
fn multipolygon_to_geojson(shape: &MultiPolygon<f64>) -> Value {
    let polygons = shape.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

impl JoinedLayer {
    /// Export as a GeoJSON FeatureCollection with `name`, `council` and the category's score.
    /// `fills`, when given, adds one `fill` colour per region.
    pub fn to_geojson(&self, category: Category, fills: Option<&[String]>) -> Value {
        let field = category.score_field();
        let features = self.iter().enumerate()
            .map(|(idx, (region, shape, score))| {
                let mut properties = Map::new();
                properties.insert("name".into(), json!(region.name));
                properties.insert("council".into(), json!(region.council));
                properties.insert(field.clone(), json!(score.get(category)));
                if let Some(fill) = fills.and_then(|fills| fills.get(idx)) {
                    properties.insert("fill".into(), json!(fill));
                }

                json!({
                    "type": "Feature",
                    "id": idx,
                    "geometry": multipolygon_to_geojson(shape),
                    "properties": properties,
                })
            })
            .collect::<Vec<_>>();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

/// Write a GeoJSON value to `path`.
pub(crate) fn write_geojson(value: &Value, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)
        .map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;

    use super::boundaries_from_geojson;
    use crate::{config::InputConfig, io::RawBoundaries};

    fn read_boundaries_str(text: &str, input: &InputConfig) -> Result<RawBoundaries, String> {
        boundaries_from_geojson(text.parse::<GeoJson>().map_err(|e| e.to_string())?, input)
    }

    const WARDS: &str = r#"{
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::27700" } },
        "features": [
            { "type": "Feature", "properties": { "Name": "Leith", "Council": "City of Edinburgh" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] } },
            { "type": "Feature", "properties": { "Name": "Islands", "Council": "Orkney Islands" },
              "geometry": { "type": "MultiPolygon", "coordinates": [
                  [[[2,0],[3,0],[3,1],[2,0]]],
                  [[[4,0],[5,0],[5,1],[4,0]]]
              ] } },
            { "type": "Feature", "properties": { "Council": "Nowhere" },
              "geometry": { "type": "Point", "coordinates": [0,0] } },
            { "type": "Feature", "properties": { "Name": "Pin" },
              "geometry": { "type": "Point", "coordinates": [0,0] } }
        ]
    }"#;

    #[test]
    fn polygons_are_read_with_attributes_and_crs() {
        let raw = read_boundaries_str(WARDS, &InputConfig::default()).unwrap();
        assert_eq!(raw.epsg, Some(27700));
        assert_eq!(raw.features.len(), 2);

        let (leith, shape) = &raw.features[0];
        assert_eq!(leith.name, "Leith");
        assert_eq!(leith.council.as_deref(), Some("City of Edinburgh"));
        assert_eq!(shape.0.len(), 1);
        assert_eq!(raw.features[1].1.0.len(), 2);
    }

    #[test]
    fn configured_keys_are_used() {
        let input = InputConfig { name_key: "Council".into(), council_key: "Name".into(), ..InputConfig::default() };
        let raw = read_boundaries_str(WARDS, &input).unwrap();
        assert_eq!(raw.features[0].0.name, "City of Edinburgh");
        assert_eq!(raw.features[0].0.council.as_deref(), Some("Leith"));
    }

    #[test]
    fn plain_geometry_is_rejected() {
        let text = r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }"#;
        assert!(read_boundaries_str(text, &InputConfig::default()).is_err());
    }
}
