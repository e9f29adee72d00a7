use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::{error::{Error, Result}, geom::Geometries};

/// PROJ.4 definition for the EPSG codes the boundary data is published in.
pub(crate) fn proj4_for_epsg(epsg: u32) -> Result<&'static str> {
    match epsg {
        4326 => Ok("+proj=longlat +datum=WGS84 +no_defs +type=crs"),
        4258 => Ok("+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs +type=crs"),
        4269 => Ok("+proj=longlat +datum=NAD83 +no_defs +type=crs"),
        4277 => Ok("+proj=longlat +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +no_defs +type=crs"),
        27700 => Ok("+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy \
                     +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +units=m +no_defs +type=crs"),
        3857 => Ok("+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs"),
        _ => Err(Error::UnsupportedCrs(epsg)),
    }
}

/// Whether coordinates in this CRS are lon/lat degrees.
#[inline]
pub(crate) fn is_geographic(epsg: u32) -> bool {
    matches!(epsg, 4326 | 4258 | 4269 | 4277)
}

fn build_proj(proj_string: &str) -> Result<Proj4> {
    Proj4::from_proj_string(proj_string)
        .map_err(|e| Error::Projection(format!("failed to build PROJ.4 {proj_string:?}: {e:?}")))
}

/// A source -> target coordinate transform. Geographic ends take and return degrees.
pub(crate) struct Transformer {
    from: Proj4,
    to: Proj4,
    from_geographic: bool,
    to_geographic: bool,
}

impl Transformer {
    pub(crate) fn new(from_epsg: u32, to_epsg: u32) -> Result<Self> {
        Ok(Self {
            from: build_proj(proj4_for_epsg(from_epsg)?)?,
            to: build_proj(proj4_for_epsg(to_epsg)?)?,
            from_geographic: is_geographic(from_epsg),
            to_geographic: is_geographic(to_epsg),
        })
    }

    /// Transform from `from_epsg` into the WGS84 UTM zone containing `center` (given in lon/lat).
    pub(crate) fn to_utm(from_epsg: u32, center: Coord<f64>) -> Result<Self> {
        let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
        let south = if center.y >= 0.0 { "" } else { " +south" };
        let utm = format!("+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs");

        Ok(Self {
            from: build_proj(proj4_for_epsg(from_epsg)?)?,
            to: build_proj(&utm)?,
            from_geographic: is_geographic(from_epsg),
            to_geographic: false,
        })
    }

    /// Transform a single coordinate.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.from_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.from, &self.to, &mut point)
            .map_err(|e| Error::Projection(format!("({}, {}): {e:?}", coord.x, coord.y)))?;

        Ok(if self.to_geographic {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    pub(crate) fn shape(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.coord(coord))
    }
}

impl Geometries {
    /// Reproject every shape into `target`. Order and ring structure are preserved;
    /// reprojecting to the current code returns an identical copy.
    pub(crate) fn reproject(&self, target: u32) -> Result<Geometries> {
        if target == self.epsg() { return Ok(self.clone()) }

        let transformer = Transformer::new(self.epsg(), target)?;
        let shapes = self.shapes().iter()
            .map(|shape| transformer.shape(shape))
            .collect::<Result<Vec<_>>>()?;

        Ok(Geometries::new(shapes, target))
    }
}
