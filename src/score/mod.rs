mod gap;
mod pivot;
mod table;

pub use gap::{gap, gap_ratio_of_ratios};
pub use pivot::{pivot, CategoryCounts, WardCounts};
pub use table::{ScoreSummary, ScoreTable, WardScore};
