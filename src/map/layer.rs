use ahash::AHashMap;
use geo::{MultiPolygon, Point, Rect};
use tracing::{debug, warn};

use crate::{error::{Error, Result}, geom::{self, Geometries}, map::Region};

/// An ordered set of regions, each owning one shape, all in one coordinate reference system.
#[derive(Debug, Clone)]
pub struct RegionLayer {
    regions: Vec<Region>,
    index: AHashMap<String, usize>, // region name -> position
    geoms: Geometries,
}

impl RegionLayer {
    /// Build a layer from (region, shape) pairs in `epsg`.
    /// Region names are unique keys; a repeated name keeps its first occurrence.
    pub fn from_features(features: Vec<(Region, MultiPolygon<f64>)>, epsg: u32) -> Self {
        let mut regions = Vec::with_capacity(features.len());
        let mut shapes = Vec::with_capacity(features.len());
        let mut index = AHashMap::with_capacity(features.len());

        for (region, shape) in features {
            if index.contains_key(&region.name) {
                warn!(region = %region.name, "duplicate region name; keeping first occurrence");
                continue;
            }
            index.insert(region.name.clone(), regions.len());
            regions.push(region);
            shapes.push(shape);
        }

        Self { regions, index, geoms: Geometries::new(shapes, epsg) }
    }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    #[inline] pub fn regions(&self) -> &[Region] { &self.regions }

    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { self.geoms.shapes() }

    /// EPSG code of the layer's coordinates.
    #[inline] pub fn epsg(&self) -> u32 { self.geoms.epsg() }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    /// Position of the region called `name` (exact, case-sensitive).
    #[inline] pub fn index_of(&self, name: &str) -> Option<usize> { self.index.get(name).copied() }

    pub fn iter(&self) -> impl Iterator<Item = (&Region, &MultiPolygon<f64>)> {
        self.regions.iter().zip(self.geoms.shapes())
    }

    /// Bounding rectangle of every shape in the layer.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.geoms.bounds() }

    /// Centroid of each region's shape, in layer order.
    #[inline] pub fn centroids(&self) -> Vec<Option<Point<f64>>> { self.geoms.centroids() }

    /// Centroid of the union of all regions.
    #[inline] pub fn center(&self) -> Option<Point<f64>> { self.geoms.center() }

    /// Region covering `point` (same CRS as the layer). Shared boundaries go to the lower index.
    #[inline] pub fn locate(&self, point: &Point<f64>) -> Option<usize> { self.geoms.locate(point) }

    /// Reproject all shapes into `target`, keeping region order and attributes.
    pub fn reproject(&self, target: u32) -> Result<Self> {
        debug!(from = self.epsg(), to = target, regions = self.len(), "reprojecting layer");
        Ok(Self {
            regions: self.regions.clone(),
            index: self.index.clone(),
            geoms: self.geoms.reproject(target)?,
        })
    }

    /// Repair invalid shapes. Fails on the first shape that cannot be repaired.
    pub fn make_valid(&self) -> Result<Self> {
        let mut repaired = 0;
        let shapes = self.iter()
            .map(|(region, shape)| {
                let fixed = geom::repair_shape(shape)
                    .map_err(|reason| Error::InvalidGeometry { region: region.name.clone(), reason })?;
                if &fixed != shape { repaired += 1 }
                Ok(fixed)
            })
            .collect::<Result<Vec<_>>>()?;

        if repaired > 0 { warn!(repaired, "repaired invalid region geometries") }

        Ok(Self {
            regions: self.regions.clone(),
            index: self.index.clone(),
            geoms: Geometries::new(shapes, self.epsg()),
        })
    }

    /// Sub-layer with the regions at `indices`, in that order.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        let regions = indices.iter().map(|&i| self.regions[i].clone()).collect::<Vec<_>>();
        let index = regions.iter().enumerate().map(|(i, region)| (region.name.clone(), i)).collect();
        Self { regions, index, geoms: self.geoms.select(indices) }
    }

    /// Indices of the regions whose council equals `council`.
    pub(crate) fn council_indices(&self, council: &str) -> Vec<usize> {
        self.regions.iter().enumerate()
            .filter(|(_, region)| region.council.as_deref() == Some(council))
            .map(|(i, _)| i)
            .collect()
    }

    /// Sub-layer with only the regions inside `council`.
    pub fn filter_by_council(&self, council: &str) -> Self {
        self.select(&self.council_indices(council))
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon, Point, Validation};

    use super::RegionLayer;
    use crate::{error::Error, map::Region};

    fn square(x0: f64, y0: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0), (x: x0 + 1.0, y: y0), (x: x0 + 1.0, y: y0 + 1.0), (x: x0, y: y0 + 1.0), (x: x0, y: y0),
        ]])
    }

    fn layer() -> RegionLayer {
        RegionLayer::from_features(vec![
            (Region::new("Leith", Some("City of Edinburgh".into())), square(0.0, 0.0)),
            (Region::new("Partick East/Kelvindale", Some("Glasgow City".into())), square(5.0, 0.0)),
            (Region::new("Leith Walk", Some("City of Edinburgh".into())), square(1.0, 0.0)),
        ], 27700)
    }

    #[test]
    fn duplicate_names_keep_first() {
        let layer = RegionLayer::from_features(vec![
            (Region::new("A", None), square(0.0, 0.0)),
            (Region::new("A", None), square(3.0, 3.0)),
        ], 27700);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.locate(&Point::new(0.5, 0.5)), Some(0));
        assert_eq!(layer.locate(&Point::new(3.5, 3.5)), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let layer = layer();
        assert_eq!(layer.index_of("Leith"), Some(0));
        assert_eq!(layer.index_of("leith"), None);
    }

    #[test]
    fn council_filter_keeps_order_and_reindexes() {
        let edinburgh = layer().filter_by_council("City of Edinburgh");
        assert_eq!(edinburgh.len(), 2);
        assert_eq!(edinburgh.index_of("Leith Walk"), Some(1));
        assert_eq!(edinburgh.index_of("Partick East/Kelvindale"), None);

        let center = edinburgh.center().unwrap();
        assert!((center.x() - 1.0).abs() < 1e-9);
        assert!((center.y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn make_valid_keeps_valid_layer_intact() {
        let layer = layer();
        let valid = layer.make_valid().unwrap();
        assert_eq!(valid.shapes(), layer.shapes());
        assert_eq!(valid.regions(), layer.regions());
    }

    #[test]
    fn make_valid_repairs_self_intersections() {
        let bow_tie = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0),
        ]]);
        let layer = RegionLayer::from_features(vec![(Region::new("Leith", None), bow_tie.clone())], 27700);
        let valid = layer.make_valid().unwrap();
        assert_ne!(valid.shapes()[0], bow_tie);
        assert!(valid.shapes()[0].is_valid());
    }

    #[test]
    fn unrepairable_shape_names_its_region() {
        let broken = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0), (x: f64::INFINITY, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0),
        ]]);
        let layer = RegionLayer::from_features(vec![(Region::new("Leith", None), broken)], 27700);
        match layer.make_valid() {
            Err(Error::InvalidGeometry { region, reason }) => {
                assert_eq!(region, "Leith");
                assert!(reason.contains("non-finite"));
            }
            other => panic!("expected InvalidGeometry, got {other:?}"),
        }
    }
}
