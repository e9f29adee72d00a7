use std::fmt;

use serde::{Deserialize, Serialize};

/// National Statistics Socio-economic Classification (NS-SeC) analytic class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category { C1, C2, C3, C4, C5, C6, C7, C8 }

impl Category {
    pub const ALL: [Category; 8] = [
        Category::C1, Category::C2, Category::C3, Category::C4,
        Category::C5, Category::C6, Category::C7, Category::C8,
    ];

    /// Position of the category in [`Category::ALL`].
    #[inline] pub fn index(self) -> usize { self as usize }

    /// Short label, e.g. `C3`.
    pub fn label(self) -> &'static str {
        match self {
            Category::C1 => "C1",
            Category::C2 => "C2",
            Category::C3 => "C3",
            Category::C4 => "C4",
            Category::C5 => "C5",
            Category::C6 => "C6",
            Category::C7 => "C7",
            Category::C8 => "C8",
        }
    }

    /// Name of the score attribute for this category, e.g. `gap_C3`.
    pub fn score_field(self) -> String { format!("gap_{}", self.label()) }

    pub fn description(self) -> &'static str {
        match self {
            Category::C1 => "Higher managerial, administrative and professional occupations",
            Category::C2 => "Lower managerial, administrative and professional occupations",
            Category::C3 => "Intermediate occupations",
            Category::C4 => "Small employers and own account workers",
            Category::C5 => "Lower supervisory and technical occupations",
            Category::C6 => "Semi-routine occupations",
            Category::C7 => "Routine occupations",
            Category::C8 => "Never worked and long-term unemployed",
        }
    }

    /// Parse `C1`..`C8` (case-insensitive) or a bare digit `1`..`8`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix(['C', 'c']).unwrap_or(s);
        match digits.parse::<usize>().ok()? {
            n @ 1..=8 => Some(Self::ALL[n - 1]),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Sex breakdown used by the census tables; `All` is the category total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender { Female, Male, All }

impl Gender {
    /// Match the labels census extracts use for the sex column.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "females" | "f" => Some(Gender::Female),
            "male" | "males" | "m" => Some(Gender::Male),
            "all" | "all people" | "total" | "persons" => Some(Gender::All),
            _ => None,
        }
    }
}

/// One long-form count: (region, category, gender) -> count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationCount {
    pub region: String,
    pub category: Category,
    pub gender: Gender,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::{Category, Gender};

    #[test]
    fn category_parse_accepts_labels_and_digits() {
        assert_eq!(Category::parse("C1"), Some(Category::C1));
        assert_eq!(Category::parse("c8"), Some(Category::C8));
        assert_eq!(Category::parse(" 4 "), Some(Category::C4));
        assert_eq!(Category::parse("C9"), None);
        assert_eq!(Category::parse("C0"), None);
        assert_eq!(Category::parse("total"), None);
    }

    #[test]
    fn category_index_matches_all_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(Category::C5.score_field(), "gap_C5");
    }

    #[test]
    fn gender_labels() {
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("MALES"), Some(Gender::Male));
        assert_eq!(Gender::parse("All people"), Some(Gender::All));
        assert_eq!(Gender::parse("Other"), None);
    }
}
