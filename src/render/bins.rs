use crate::{config::BinStyle, error::{Error, Result}};

/// Ascending class edges. Bin `i` covers `[edges[i], edges[i + 1])`; the last bin also
/// includes its upper edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// Sort and de-duplicate `edges`. Needs at least two distinct, non-NaN edges.
    pub fn new(mut edges: Vec<f64>) -> Result<Self> {
        if edges.iter().any(|edge| edge.is_nan()) {
            return Err(Error::InvalidRenderSpec("breaks must not contain NaN".into()));
        }
        edges.sort_by(f64::total_cmp);
        edges.dedup();
        if edges.len() < 2 {
            return Err(Error::InvalidRenderSpec(format!("need at least two distinct breaks, got {edges:?}")));
        }
        Ok(Self { edges })
    }

    /// `classes` equal-width bins spanning the defined values.
    pub fn equal(values: &[Option<f64>], classes: usize) -> Result<Self> {
        let (min, max) = range(values)?;
        if min == max { return Self::new(vec![min - 0.5, max + 0.5]) }

        let classes = classes.max(1);
        let step = (max - min) / classes as f64;
        Self::new((0..=classes).map(|i| if i == classes { max } else { min + step * i as f64 }).collect())
    }

    /// Up to `classes` bins with roughly equal counts of defined values. Ties can merge bins.
    pub fn quantile(values: &[Option<f64>], classes: usize) -> Result<Self> {
        let (min, max) = range(values)?;
        if min == max { return Self::new(vec![min - 0.5, max + 0.5]) }

        let mut sorted = values.iter().flatten().copied().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);

        let classes = classes.max(1);
        let last = sorted.len() - 1;
        Self::new((0..=classes)
            .map(|i| sorted[(i * last + classes / 2) / classes])
            .collect())
    }

    /// Bins for a configured style. `breaks` is only used by [`BinStyle::Fixed`].
    pub fn from_style(style: BinStyle, breaks: &[f64], classes: usize, values: &[Option<f64>]) -> Result<Self> {
        match style {
            BinStyle::Fixed => Self::new(breaks.to_vec()),
            BinStyle::Equal => Self::equal(values, classes),
            BinStyle::Quantile => Self::quantile(values, classes),
        }
    }

    #[inline] pub fn edges(&self) -> &[f64] { &self.edges }

    /// Number of bins.
    #[inline] pub fn len(&self) -> usize { self.edges.len() - 1 }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Bin holding `value`; None for undefined or out-of-range values.
    pub fn classify(&self, value: Option<f64>) -> Option<usize> {
        let value = value.filter(|v| !v.is_nan())?;
        let (first, last) = (self.edges[0], self.edges[self.edges.len() - 1]);
        if value < first || value > last { return None }
        Some((self.edges.partition_point(|&edge| edge <= value) - 1).min(self.len() - 1))
    }

    /// Human-readable range for each bin.
    pub fn labels(&self) -> Vec<String> {
        self.edges.windows(2)
            .map(|pair| match (pair[0], pair[1]) {
                (lo, hi) if lo == f64::NEG_INFINITY => format!("below {}", format_edge(hi)),
                (lo, hi) if hi == f64::INFINITY => format!("{} or more", format_edge(lo)),
                (lo, hi) => format!("{} to {}", format_edge(lo), format_edge(hi)),
            })
            .collect()
    }
}

/// Smallest and largest defined value.
fn range(values: &[Option<f64>]) -> Result<(f64, f64)> {
    let defined = values.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = defined.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return Err(Error::InvalidRenderSpec("no defined values to derive breaks from".into()));
    }
    Ok((min, max))
}

fn format_edge(edge: f64) -> String {
    if edge.fract() == 0.0 { format!("{edge:.0}") } else { format!("{edge:.1}") }
}

#[cfg(test)]
mod tests {
    use super::Bins;
    use crate::error::Error;

    #[test]
    fn edges_are_sorted_and_deduplicated() {
        let bins = Bins::new(vec![150.0, 0.0, 100.0, 50.0, 100.0]).unwrap();
        assert_eq!(bins.edges(), &[0.0, 50.0, 100.0, 150.0]);
        assert_eq!(bins.len(), 3);
    }

    #[test]
    fn bad_breaks_are_rejected() {
        assert!(matches!(Bins::new(vec![1.0, f64::NAN]), Err(Error::InvalidRenderSpec(_))));
        assert!(matches!(Bins::new(vec![5.0, 5.0]), Err(Error::InvalidRenderSpec(_))));
        assert!(matches!(Bins::new(vec![]), Err(Error::InvalidRenderSpec(_))));
    }

    #[test]
    fn classify_uses_half_open_bins_with_closed_top() {
        let bins = Bins::new(vec![0.0, 50.0, 100.0, 150.0]).unwrap();
        assert_eq!(bins.classify(Some(0.0)), Some(0));
        assert_eq!(bins.classify(Some(49.9)), Some(0));
        assert_eq!(bins.classify(Some(50.0)), Some(1));
        assert_eq!(bins.classify(Some(100.0)), Some(2));
        assert_eq!(bins.classify(Some(150.0)), Some(2));
        assert_eq!(bins.classify(Some(150.1)), None);
        assert_eq!(bins.classify(Some(-1.0)), None);
        assert_eq!(bins.classify(None), None);
    }

    #[test]
    fn open_ended_top_bin() {
        let bins = Bins::new(vec![0.0, 100.0, f64::INFINITY]).unwrap();
        assert_eq!(bins.classify(Some(1e6)), Some(1));
        assert_eq!(bins.labels(), vec!["0 to 100".to_string(), "100 or more".to_string()]);
    }

    #[test]
    fn equal_interval_spans_data() {
        let values = [Some(20.0), None, Some(120.0), Some(70.0)];
        let bins = Bins::equal(&values, 4).unwrap();
        assert_eq!(bins.edges(), &[20.0, 45.0, 70.0, 95.0, 120.0]);
        assert!(values.iter().flatten().all(|&v| bins.classify(Some(v)).is_some()));
    }

    #[test]
    fn quantile_bins_cover_every_value() {
        let values = (1..=20).map(|v| Some(v as f64 * 10.0)).collect::<Vec<_>>();
        let bins = Bins::quantile(&values, 4).unwrap();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.edges()[0], 10.0);
        assert_eq!(bins.edges()[4], 200.0);
        assert!(values.iter().all(|&v| bins.classify(v).is_some()));
    }

    #[test]
    fn constant_data_still_gets_one_bin() {
        let bins = Bins::quantile(&[Some(100.0), Some(100.0)], 5).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.classify(Some(100.0)), Some(0));
        assert!(Bins::equal(&[None], 5).is_err());
    }
}
