use geo::{BoundingRect, Contains, InteriorPoint, MultiPolygon, Point, Rect};
use rand::Rng;

use crate::geom::Geometries;

/// Rejection-sampling attempts per point before falling back to the interior point.
const MAX_ATTEMPTS: usize = 1000;

/// Draw one point strictly inside `shape`.
fn sample_point<R: Rng>(shape: &MultiPolygon<f64>, bbox: &Rect<f64>, rng: &mut R) -> Option<Point<f64>> {
    if bbox.width() > 0.0 && bbox.height() > 0.0 {
        for _ in 0..MAX_ATTEMPTS {
            let x = rng.random_range(bbox.min().x..bbox.max().x);
            let y = rng.random_range(bbox.min().y..bbox.max().y);
            let point = Point::new(x, y);
            if shape.contains(&point) { return Some(point) }
        }
    }
    shape.interior_point()
}

impl Geometries {
    /// Sample `per_shape` points inside every shape; each point is tagged with its source index.
    /// Empty shapes contribute no points.
    pub(crate) fn sample_interior<R: Rng>(&self, per_shape: usize, rng: &mut R) -> Vec<(usize, Point<f64>)> {
        let mut points = Vec::with_capacity(self.len() * per_shape);
        for (idx, shape) in self.shapes().iter().enumerate() {
            let Some(bbox) = shape.bounding_rect() else { continue };
            for _ in 0..per_shape {
                if let Some(point) = sample_point(shape, &bbox, rng) {
                    points.push((idx, point));
                }
            }
        }
        points
    }
}
