use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal conditions raised by the pipeline.
///
/// Recoverable conditions never show up here: unmatched join keys are listed in a
/// [`JoinReport`](crate::JoinReport) and undefined scores are `None` cells.
#[derive(Debug, Error)]
pub enum Error {
    /// An input file is missing, unreadable or malformed.
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A geometry is still invalid after the repair step.
    #[error("invalid geometry for region {region:?}: {reason}")]
    InvalidGeometry { region: String, reason: String },

    #[error("unsupported coordinate reference system EPSG:{0}")]
    UnsupportedCrs(u32),

    #[error("coordinate transform failed: {0}")]
    Projection(String),

    #[error("invalid render spec: {0}")]
    InvalidRenderSpec(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("table operation failed: {0}")]
    Table(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unavailable(path: &Path, reason: impl ToString) -> Self {
        Self::DataUnavailable { path: path.to_path_buf(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
