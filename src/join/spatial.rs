use geo::Point;
use rand::{rngs::StdRng, SeedableRng};

use crate::map::{Region, RegionLayer};

/// A point drawn inside a region, tagged with the region it was drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledPoint {
    pub point: Point<f64>,
    pub source: usize,
}

/// The region attributes a point picked up from the polygon covering it.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMatch {
    pub point: Point<f64>,
    /// Index into the layer, None if no polygon covers the point.
    pub region_idx: Option<usize>,
    pub region: Option<Region>,
}

/// Draw `per_region` points strictly inside every region, reproducibly from `seed`.
/// Points are in the layer's CRS.
pub fn sample_points(layer: &RegionLayer, per_region: usize, seed: u64) -> Vec<SampledPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    layer.geoms().sample_interior(per_region, &mut rng).into_iter()
        .map(|(source, point)| SampledPoint { point, source })
        .collect()
}

/// Point-in-polygon join: each point takes the attributes of the region covering it.
///
/// Points must be in the layer's CRS. A point inside no region gets `None`. A point on a
/// boundary shared by several regions is assigned to the region listed first in the layer.
pub fn join_points(points: &[Point<f64>], layer: &RegionLayer) -> Vec<PointMatch> {
    points.iter()
        .map(|point| {
            let region_idx = layer.locate(point);
            PointMatch {
                point: *point,
                region_idx,
                region: region_idx.map(|i| layer.regions()[i].clone()),
            }
        })
        .collect()
}
