use crate::score::CategoryCounts;

/// Equality score: female count per male count, scaled by 100.
///
/// 100 is parity, above 100 women are over-represented, below 100 men are.
/// None when any count is missing, when the total is zero, or when the male count is zero.
pub fn gap(counts: &CategoryCounts) -> Option<f64> {
    let (female, male, total) = (counts.female?, counts.male?, counts.total?);
    if male == 0 || total == 0 { return None }
    Some(female as f64 / male as f64 * 100.0)
}

/// The score as first derived: the female share of the total over the male share, scaled by 100.
///
/// The shared denominator cancels, so this agrees with [`gap`] wherever both are defined;
/// it is kept to check that simplification.
pub fn gap_ratio_of_ratios(counts: &CategoryCounts) -> Option<f64> {
    let (female, male, total) = (counts.female?, counts.male?, counts.total?);
    if male == 0 || total == 0 { return None }
    let total = total as f64;
    Some((female as f64 / total) / (male as f64 / total) * 100.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{gap, gap_ratio_of_ratios};
    use crate::score::CategoryCounts;

    #[test]
    fn worked_examples() {
        assert_eq!(gap(&CategoryCounts::new(2, 8, 10)), Some(25.0));
        assert_eq!(gap(&CategoryCounts::new(5, 5, 10)), Some(100.0));
        assert_eq!(gap(&CategoryCounts::new(6, 3, 9)), Some(200.0));
    }

    #[test]
    fn equal_counts_give_parity() {
        for n in 1..500u64 {
            let score = gap(&CategoryCounts::new(n, n, 2 * n)).unwrap();
            assert!((score - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_male_or_total_is_undefined() {
        assert_eq!(gap(&CategoryCounts::new(4, 0, 4)), None);
        assert_eq!(gap(&CategoryCounts::new(0, 0, 0)), None);
        assert_eq!(gap(&CategoryCounts::new(3, 2, 0)), None);
        assert_eq!(gap_ratio_of_ratios(&CategoryCounts::new(4, 0, 4)), None);
    }

    #[test]
    fn missing_count_is_undefined() {
        let counts = CategoryCounts { female: Some(3), male: None, total: Some(5) };
        assert_eq!(gap(&counts), None);
        let counts = CategoryCounts { female: Some(3), male: Some(2), total: None };
        assert_eq!(gap(&counts), None);
    }

    proptest! {
        #[test]
        fn simplified_form_matches_ratio_of_ratios(female in 0..1_000_000u64, male in 0..1_000_000u64, extra in 0..1_000u64) {
            let counts = CategoryCounts::new(female, male, female + male + extra);
            match (gap(&counts), gap_ratio_of_ratios(&counts)) {
                (Some(a), Some(b)) => {
                    prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "{} != {} for {:?}", a, b, counts);
                }
                (a, b) => { prop_assert_eq!(a, b); }
            }
        }

        #[test]
        fn no_men_means_no_score(female in any::<u32>(), total in any::<u32>()) {
            let counts = CategoryCounts::new(female as u64, 0, total as u64);
            prop_assert_eq!(gap(&counts), None);
            prop_assert_eq!(gap_ratio_of_ratios(&counts), None);
        }
    }
}
