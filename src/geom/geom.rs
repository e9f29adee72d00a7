use geo::{BooleanOps, BoundingRect, Centroid, Coord, MultiPolygon, Point, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// Bounding rectangle of one shape, tagged with the shape's index.
#[derive(Debug, Clone)]
pub(super) struct IndexedRect {
    idx: usize,
    rect: Rect<f64>,
}

impl IndexedRect {
    #[inline] pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.rect.min().into(), self.rect.max().into())
    }
}

/// An ordered collection of MultiPolygons tagged with one EPSG code, with an R-tree over their bounds.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<IndexedRect>,
    epsg: u32,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes are kept (so indices line up) but never indexed.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>, epsg: u32) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(idx, shape)| shape.bounding_rect().map(|rect| IndexedRect { idx, rect }))
                    .collect()
            ),
            shapes,
            epsg,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub(crate) fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// EPSG code of every coordinate in the collection.
    #[inline] pub(crate) fn epsg(&self) -> u32 { self.epsg }

    /// Indices of shapes whose bounding box touches the given point, ascending.
    pub(crate) fn candidates(&self, point: &Point<f64>) -> Vec<usize> {
        let mut indices = self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .map(IndexedRect::idx)
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    /// Keep only the shapes at the given indices, in the given order.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self::new(indices.iter().map(|&i| self.shapes[i].clone()).collect(), self.epsg)
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    pub(crate) fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|shape| shape.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }

    /// Compute the centroid of each MultiPolygon (None for empty shapes).
    pub(crate) fn centroids(&self) -> Vec<Option<Point<f64>>> {
        self.shapes.iter().map(|shape| shape.centroid()).collect()
    }

    /// Compute the union of all MultiPolygons into a single MultiPolygon.
    pub(crate) fn union(&self) -> Option<MultiPolygon<f64>> {
        self.shapes.iter().cloned().reduce(|a, b| a.union(&b))
    }

    /// Centroid of the union of all shapes.
    pub(crate) fn center(&self) -> Option<Point<f64>> {
        self.union()?.centroid()
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon, Point};

    use super::Geometries;

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]])
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let geoms = Geometries::new(vec![square(0.0, 0.0, 1.0), square(3.0, 2.0, 1.0)], 27700);
        let bounds = geoms.bounds().unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, 0.0);
        assert_eq!(bounds.max().x, 4.0);
        assert_eq!(bounds.max().y, 3.0);
    }

    #[test]
    fn center_of_two_adjacent_squares() {
        let geoms = Geometries::new(vec![square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)], 27700);
        let center = geoms.center().unwrap();
        assert!((center.x() - 1.0).abs() < 1e-9);
        assert!((center.y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn candidates_are_sorted_and_skip_empty_shapes() {
        let geoms = Geometries::new(vec![
            square(0.0, 0.0, 2.0),
            MultiPolygon::new(vec![]),
            square(1.0, 1.0, 2.0),
        ], 4326);
        assert_eq!(geoms.candidates(&Point::new(1.5, 1.5)), vec![0, 2]);
        assert_eq!(geoms.candidates(&Point::new(10.0, 10.0)), Vec::<usize>::new());
        assert_eq!(geoms.len(), 3);
    }
}
