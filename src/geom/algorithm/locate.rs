use geo::{Intersects, Point};

use crate::geom::Geometries;

impl Geometries {
    /// Index of the shape covering `point` (interior or boundary), or None.
    /// A point on a boundary shared by several shapes goes to the lowest index.
    pub(crate) fn locate(&self, point: &Point<f64>) -> Option<usize> {
        self.candidates(point).into_iter()
            .find(|&idx| self.shapes()[idx].intersects(point))
    }
}
