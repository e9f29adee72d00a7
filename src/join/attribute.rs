use ahash::AHashSet;
use geo::MultiPolygon;
use tracing::{info, warn};

use crate::{
    error::Result,
    map::{Region, RegionLayer},
    score::{ScoreTable, WardScore},
    types::Category,
};

/// Keys that found no partner in an attribute join.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Boundary regions with no score record, in layer order.
    pub unmatched_regions: Vec<String>,
    /// Score records with no boundary region, in table order.
    pub unmatched_scores: Vec<String>,
}

impl JoinReport {
    /// Total rows dropped from both sides (the symmetric difference of the key sets).
    #[inline] pub fn dropped(&self) -> usize { self.unmatched_regions.len() + self.unmatched_scores.len() }

    #[inline] pub fn is_clean(&self) -> bool { self.dropped() == 0 }
}

/// Regions merged with their scores; `scores()[i]` belongs to `layer().regions()[i]`.
#[derive(Clone, Debug)]
pub struct JoinedLayer {
    layer: RegionLayer,
    scores: Vec<WardScore>,
}

impl JoinedLayer {
    #[inline] pub fn len(&self) -> usize { self.scores.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.scores.is_empty() }

    #[inline] pub fn layer(&self) -> &RegionLayer { &self.layer }

    #[inline] pub fn scores(&self) -> &[WardScore] { &self.scores }

    #[inline] pub fn epsg(&self) -> u32 { self.layer.epsg() }

    pub fn iter(&self) -> impl Iterator<Item = (&Region, &MultiPolygon<f64>, &WardScore)> {
        self.layer.iter().zip(&self.scores).map(|((region, shape), score)| (region, shape, score))
    }

    /// Fill values for one category, in region order.
    pub fn values(&self, category: Category) -> Vec<Option<f64>> {
        self.scores.iter().map(|score| score.get(category)).collect()
    }

    /// Reproject the geometries; scores stay attached to the same regions.
    pub fn reproject(&self, target: u32) -> Result<Self> {
        Ok(Self { layer: self.layer.reproject(target)?, scores: self.scores.clone() })
    }

    /// Keep only the regions inside `council`.
    pub fn filter_by_council(&self, council: &str) -> Self {
        let indices = self.layer.council_indices(council);
        Self {
            layer: self.layer.select(&indices),
            scores: indices.iter().map(|&i| self.scores[i].clone()).collect(),
        }
    }
}

/// Inner join of boundaries and scores on the exact region name.
/// Output follows boundary order; every unmatched key on either side is listed in the report.
pub fn join_scores(layer: &RegionLayer, table: &ScoreTable) -> (JoinedLayer, JoinReport) {
    let mut matched = Vec::new();
    let mut scores = Vec::new();
    let mut report = JoinReport::default();

    for (idx, region) in layer.regions().iter().enumerate() {
        match table.get(&region.name) {
            Some(score) => {
                matched.push(idx);
                scores.push(score.clone());
            }
            None => report.unmatched_regions.push(region.name.clone()),
        }
    }

    let names = layer.regions().iter().map(|region| region.name.as_str()).collect::<AHashSet<_>>();
    report.unmatched_scores = table.iter()
        .filter(|score| !names.contains(score.name.as_str()))
        .map(|score| score.name.clone())
        .collect();

    info!(joined = matched.len(), unmatched_regions = report.unmatched_regions.len(),
        unmatched_scores = report.unmatched_scores.len(), "joined scores to boundaries");
    for name in report.unmatched_regions.iter().take(10) {
        warn!(region = %name, "boundary region has no score record");
    }
    for name in report.unmatched_scores.iter().take(10) {
        warn!(region = %name, "score record has no boundary region");
    }

    (JoinedLayer { layer: layer.select(&matched), scores }, report)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};
    use proptest::prelude::*;

    use super::join_scores;
    use crate::{
        map::{Region, RegionLayer},
        score::{ScoreTable, WardScore},
        types::Category,
    };

    fn square(x0: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: 0.0), (x: x0 + 1.0, y: 0.0), (x: x0 + 1.0, y: 1.0), (x: x0, y: 1.0), (x: x0, y: 0.0),
        ]])
    }

    fn layer(names: &[&str]) -> RegionLayer {
        RegionLayer::from_features(
            names.iter().enumerate()
                .map(|(i, name)| (Region::new(*name, Some("Council".into())), square(i as f64)))
                .collect(),
            27700,
        )
    }

    fn table(names: &[&str]) -> ScoreTable {
        ScoreTable::new(names.iter().enumerate()
            .map(|(i, name)| WardScore { name: name.to_string(), gaps: [Some(i as f64 * 10.0); 8] })
            .collect())
    }

    #[test]
    fn three_boundaries_two_scores() {
        let (joined, report) = join_scores(&layer(&["A", "B", "C"]), &table(&["A", "B"]));
        assert_eq!(joined.len(), 2);
        assert_eq!(report.unmatched_regions, vec!["C".to_string()]);
        assert!(report.unmatched_scores.is_empty());
        assert_eq!(report.dropped(), 1);
    }

    #[test]
    fn scores_follow_their_region() {
        let (joined, report) = join_scores(&layer(&["C", "A", "B"]), &table(&["A", "B", "D"]));
        assert_eq!(joined.layer().regions().iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(joined.values(Category::C1), vec![Some(0.0), Some(10.0)]);
        // Region "A" kept the second square.
        assert_eq!(joined.layer().shapes()[0], square(1.0));
        assert_eq!(report.unmatched_regions, vec!["C".to_string()]);
        assert_eq!(report.unmatched_scores, vec!["D".to_string()]);
    }

    #[test]
    fn names_match_case_sensitively() {
        let (joined, report) = join_scores(&layer(&["Leith"]), &table(&["leith"]));
        assert!(joined.is_empty());
        assert_eq!(report.dropped(), 2);
    }

    proptest! {
        #[test]
        fn joined_count_bounded_and_dropped_is_symmetric_difference(
            regions in prop::collection::btree_set("[A-F][a-c]{0,2}", 0..12),
            scores in prop::collection::btree_set("[A-F][a-c]{0,2}", 0..12),
        ) {
            let region_names = regions.iter().map(String::as_str).collect::<Vec<_>>();
            let score_names = scores.iter().map(String::as_str).collect::<Vec<_>>();
            let (joined, report) = join_scores(&layer(&region_names), &table(&score_names));

            prop_assert!(joined.len() <= regions.len().min(scores.len()));
            prop_assert_eq!(joined.len(), regions.intersection(&scores).count());
            prop_assert_eq!(report.dropped(), regions.symmetric_difference(&scores).count());
        }
    }
}
