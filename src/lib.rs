#![doc = "Ward-level equality scores from census NS-SeC counts, joined to boundaries and mapped as choropleths"]
pub mod cli;
pub mod commands;
mod config;
mod error;
mod geom;
mod io;
mod join;
mod map;
pub mod pipeline;
mod render;
mod score;
mod types;

#[doc(inline)]
pub use config::{BinStyle, Config, InputConfig, ProcessingConfig, RenderConfig, StatisticsConfig};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use join::{join_points, join_scores, sample_points, JoinReport, JoinedLayer, PointMatch, SampledPoint};

#[doc(inline)]
pub use map::{Region, RegionLayer};

#[doc(inline)]
pub use pipeline::Analysis;

#[doc(inline)]
pub use render::{Bins, HtmlRenderer, LabelPoint, RenderSpec, Rgb, SvgRenderer, TileProvider};

#[doc(inline)]
pub use score::{gap, gap_ratio_of_ratios, pivot, CategoryCounts, ScoreSummary, ScoreTable, WardCounts, WardScore};

#[doc(inline)]
pub use types::{Category, ClassificationCount, Gender};
