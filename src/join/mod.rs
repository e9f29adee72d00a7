mod attribute;
mod spatial;

pub use attribute::{join_scores, JoinReport, JoinedLayer};
pub use spatial::{join_points, sample_points, PointMatch, SampledPoint};
