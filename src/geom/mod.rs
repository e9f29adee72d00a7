mod algorithm;
mod geom;

pub(crate) use algorithm::{is_geographic, proj4_for_epsg, repair_shape, Transformer};
pub(crate) use geom::Geometries;
