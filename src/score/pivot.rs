use ahash::AHashMap;
use tracing::debug;

use crate::types::{Category, ClassificationCount, Gender};

/// Female, male and total counts for one category; None where the source had no row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub female: Option<u64>,
    pub male: Option<u64>,
    pub total: Option<u64>,
}

impl CategoryCounts {
    pub fn new(female: u64, male: u64, total: u64) -> Self {
        Self { female: Some(female), male: Some(male), total: Some(total) }
    }

    fn set(&mut self, gender: Gender, count: u64) -> Option<u64> {
        match gender {
            Gender::Female => self.female.replace(count),
            Gender::Male => self.male.replace(count),
            Gender::All => self.total.replace(count),
        }
    }
}

/// Wide-form counts for one region: one (female, male, total) triple per category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WardCounts {
    pub name: String,
    pub counts: [CategoryCounts; 8],
}

impl WardCounts {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), counts: [CategoryCounts::default(); 8] }
    }

    #[inline] pub fn get(&self, category: Category) -> &CategoryCounts { &self.counts[category.index()] }
}

/// Reshape long-form rows into one record per region, dropping the aggregate `sentinel` region.
/// Regions keep the order of their first row. A repeated (region, category, gender) keeps the last count.
pub fn pivot(rows: &[ClassificationCount], sentinel: &str) -> Vec<WardCounts> {
    let mut wards: Vec<WardCounts> = Vec::new();
    let mut index: AHashMap<&str, usize> = AHashMap::new();

    for row in rows.iter().filter(|row| row.region != sentinel) {
        let idx = *index.entry(row.region.as_str()).or_insert_with(|| {
            wards.push(WardCounts::new(&row.region));
            wards.len() - 1
        });

        let previous = wards[idx].counts[row.category.index()].set(row.gender, row.count);
        if previous.is_some() {
            debug!(region = %row.region, category = %row.category, gender = ?row.gender, "duplicate count row; keeping last");
        }
    }

    wards
}

#[cfg(test)]
mod tests {
    use super::{pivot, CategoryCounts};
    use crate::types::{Category, ClassificationCount, Gender};

    fn row(region: &str, category: Category, gender: Gender, count: u64) -> ClassificationCount {
        ClassificationCount { region: region.into(), category, gender, count }
    }

    #[test]
    fn sentinel_row_is_excluded() {
        let rows = vec![
            row("Scotland", Category::C1, Gender::All, 1000),
            row("A", Category::C1, Gender::All, 10),
        ];
        let wards = pivot(&rows, "Scotland");
        assert_eq!(wards.len(), 1);
        assert_eq!(wards[0].name, "A");
    }

    #[test]
    fn long_rows_become_one_record_per_region() {
        let rows = vec![
            row("B", Category::C2, Gender::Female, 3),
            row("A", Category::C1, Gender::Female, 2),
            row("A", Category::C1, Gender::Male, 8),
            row("A", Category::C1, Gender::All, 10),
            row("B", Category::C2, Gender::Male, 4),
        ];
        let wards = pivot(&rows, "Scotland");

        assert_eq!(wards.iter().map(|w| w.name.as_str()).collect::<Vec<_>>(), ["B", "A"]);
        assert_eq!(*wards[1].get(Category::C1), CategoryCounts::new(2, 8, 10));
        assert_eq!(wards[0].get(Category::C2).total, None);
        assert_eq!(*wards[0].get(Category::C7), CategoryCounts::default());
    }

    #[test]
    fn repeated_cell_keeps_last() {
        let rows = vec![
            row("A", Category::C3, Gender::Male, 1),
            row("A", Category::C3, Gender::Male, 5),
        ];
        assert_eq!(pivot(&rows, "Scotland")[0].get(Category::C3).male, Some(5));
    }
}
