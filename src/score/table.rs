use ahash::AHashMap;
use polars::{frame::DataFrame, prelude::NamedFrom, series::Series};

use crate::{
    error::Result,
    score::{gap, WardCounts},
    types::{Category, ClassificationCount},
};

/// Equality scores for one region, indexed by [`Category::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct WardScore {
    pub name: String,
    pub gaps: [Option<f64>; 8],
}

impl WardScore {
    pub fn from_counts(counts: &WardCounts) -> Self {
        let mut gaps = [None; 8];
        for category in Category::ALL {
            gaps[category.index()] = gap(counts.get(category));
        }
        Self { name: counts.name.clone(), gaps }
    }

    #[inline] pub fn get(&self, category: Category) -> Option<f64> { self.gaps[category.index()] }
}

/// Descriptive statistics over the defined scores of one category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreSummary {
    pub defined: usize,
    pub undefined: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// One [`WardScore`] per region, in input order.
#[derive(Clone, Debug, Default)]
pub struct ScoreTable {
    scores: Vec<WardScore>,
    index: AHashMap<String, usize>,
}

impl ScoreTable {
    pub fn new(scores: Vec<WardScore>) -> Self {
        let index = scores.iter().enumerate().map(|(i, score)| (score.name.clone(), i)).collect();
        Self { scores, index }
    }

    /// Pivot long-form rows (minus the `sentinel` aggregate) and score every region.
    pub fn from_rows(rows: &[ClassificationCount], sentinel: &str) -> Self {
        Self::new(super::pivot(rows, sentinel).iter().map(WardScore::from_counts).collect())
    }

    #[inline] pub fn len(&self) -> usize { self.scores.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.scores.is_empty() }

    #[inline] pub fn scores(&self) -> &[WardScore] { &self.scores }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &WardScore> { self.scores.iter() }

    /// Scores of the region called `name` (exact, case-sensitive).
    pub fn get(&self, name: &str) -> Option<&WardScore> {
        self.index.get(name).map(|&i| &self.scores[i])
    }

    /// All values of one category, in table order.
    pub fn column(&self, category: Category) -> Vec<Option<f64>> {
        self.scores.iter().map(|score| score.get(category)).collect()
    }

    /// Number of undefined (None) cells across all categories.
    pub fn undefined_count(&self) -> usize {
        self.scores.iter().flat_map(|score| score.gaps).filter(Option::is_none).count()
    }

    pub fn summary(&self, category: Category) -> ScoreSummary {
        summarize(&self.column(category))
    }

    /// Table as a DataFrame: `name` then one `gap_Cn` column per category.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names = self.scores.iter().map(|score| score.name.as_str()).collect::<Vec<_>>();
        let mut columns = vec![Series::new("name".into(), names).into()];
        for category in Category::ALL {
            columns.push(Series::new(category.score_field().into(), self.column(category)).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Count, range and mean of the defined values.
pub(crate) fn summarize(values: &[Option<f64>]) -> ScoreSummary {
    let defined = values.iter().flatten().copied().collect::<Vec<_>>();
    let min = defined.iter().copied().reduce(f64::min);
    let max = defined.iter().copied().reduce(f64::max);
    let mean = (!defined.is_empty()).then(|| defined.iter().sum::<f64>() / defined.len() as f64);

    ScoreSummary { defined: defined.len(), undefined: values.len() - defined.len(), min, max, mean }
}
