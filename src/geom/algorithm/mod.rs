mod locate;
mod proj;
mod sample;
mod valid;

pub(crate) use proj::{is_geographic, proj4_for_epsg, Transformer};
pub(crate) use valid::repair_shape;
